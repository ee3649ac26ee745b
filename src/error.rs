//! Error vocabulary exposed across the solver boundary.

use thiserror::Error;

/// Errors produced by the requirement algebra and rule generator.
///
/// These map directly onto the error kinds named by the solver's external
/// interface: a caller never needs to distinguish beyond these three.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SolverError {
    /// A [`crate::Requirement`] was constructed from structurally illegal
    /// input — more than one package name, or a disjunction of constraint
    /// sets rather than a single conjunction.
    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    /// A requirement string failed to parse under the grammar in the
    /// module documentation (mismatched names across comma-separated
    /// clauses, unknown operator, malformed version).
    #[error("invalid dependency string: {0}")]
    InvalidDependencyString(String),

    /// A package full name (`"name-version"`) or other solver input was
    /// malformed in a way not covered by the two kinds above.
    #[error("solver error: {0}")]
    Solver(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SolverError>;

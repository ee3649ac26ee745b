//! Named constraints over a package: parsing, formatting, and the
//! package-full-name shortcut.
//!
//! Grammar (spec.md §6):
//!
//! ```text
//! req       := name (op_version (',' req_tail)*)?
//! req_tail  := name op_version        ; name must match preceding
//! op_version:= ('<'|'<='|'>'|'>='|'=='|'!='|'^=') version
//!            | '*'
//! ```
//!
//! `"numpy"` and `"numpy *"` both denote the any-requirement.
//! `"numpy-1.8.1-1"` is the package full name form, parsed by
//! [`Requirement::from_package_full_name`] and equivalent to `EQ(1.8.1-1)`.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::constraint::{Constraint, MultiConstraint};
use crate::error::SolverError;
use crate::version::Version;

const OPERATORS: &[&str] = &["<=", ">=", "==", "!=", "^=", "<", ">"];

/// A named constraint: `(name, constraints)`.
#[derive(Debug, Clone)]
pub struct Requirement<V> {
    name: String,
    constraints: MultiConstraint<V>,
}

impl<V: Version> PartialEq for Requirement<V> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.constraints == other.constraints
    }
}

impl<V: Version> Eq for Requirement<V> {}

impl<V: Version + Hash> Hash for Requirement<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.constraints.hash(state);
    }
}

impl<V: Version> Requirement<V> {
    /// Build a requirement directly from a name and a constraint set.
    pub fn new(name: impl Into<String>, constraints: MultiConstraint<V>) -> Self {
        Self {
            name: name.into(),
            constraints,
        }
    }

    /// Build a requirement with no version restriction.
    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, MultiConstraint::any())
    }

    /// The package name this requirement applies to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constraint conjunction.
    pub fn constraints(&self) -> &MultiConstraint<V> {
        &self.constraints
    }

    /// `true` iff `version` satisfies every primitive in [`Self::constraints`].
    pub fn matches(&self, version: &V) -> bool {
        self.constraints.matches(version)
    }

    /// `true` iff this requirement carries an actual version restriction
    /// (i.e. is not the any-constraint).
    pub fn has_any_version_constraint(&self) -> bool {
        !self.constraints.is_any()
    }

    /// Construct a requirement from the raw "tuple" shape used by the
    /// reference implementation's constraint constructor: an outer
    /// sequence of `(name, disjuncts)` pairs, where each `disjuncts` entry
    /// is itself a sequence of conjunctions (a sequence of primitives).
    ///
    /// The requirement algebra admits only a single name with a single
    /// conjunction of primitives, so this fails with
    /// [`SolverError::InvalidConstraint`] when:
    /// - the outer sequence has more than one distinct name entry, or
    /// - any entry's disjunction has more than one conjunction.
    pub fn from_constraint_groups(
        groups: &[(String, Vec<Vec<Constraint<V>>>)],
    ) -> Result<Self, SolverError>
    where
        V: Clone,
    {
        if groups.len() != 1 {
            let names: Vec<&str> = groups.iter().map(|(n, _)| n.as_str()).collect();
            return Err(SolverError::InvalidConstraint(format!(
                "requirement constraints must name exactly one package, got {names:?}"
            )));
        }
        let (name, disjuncts) = &groups[0];
        if disjuncts.len() != 1 {
            return Err(SolverError::InvalidConstraint(format!(
                "requirement constraints for {name:?} must be a single conjunction, \
                 got {} disjuncts",
                disjuncts.len()
            )));
        }
        let primitives = disjuncts[0].clone();
        Ok(Self::new(name.clone(), MultiConstraint::new(primitives)))
    }

    /// Parse a requirement string per the grammar above.
    pub fn parse(s: &str) -> Result<Self, SolverError> {
        let clauses: Vec<&str> = s.split(',').map(str::trim).collect();
        if clauses.is_empty() || clauses.iter().any(|c| c.is_empty()) {
            return Err(SolverError::InvalidDependencyString(format!(
                "empty clause in requirement string {s:?}"
            )));
        }

        let mut name: Option<String> = None;
        let mut primitives = Vec::new();

        for clause in clauses {
            let (clause_name, rest) = split_name(clause).ok_or_else(|| {
                SolverError::InvalidDependencyString(format!(
                    "missing package name in clause {clause:?}"
                ))
            })?;

            match &name {
                None => name = Some(clause_name.to_string()),
                Some(expected) if expected != clause_name => {
                    return Err(SolverError::InvalidDependencyString(format!(
                        "requirement string {s:?} mixes names {expected:?} and {clause_name:?}"
                    )));
                }
                _ => {}
            }

            if !rest.is_empty() && rest != "*" {
                primitives.push(parse_op_version(rest)?);
            }
        }

        let name = name.expect("at least one clause guaranteed by the non-empty check above");
        Ok(Self::new(name, MultiConstraint::new(primitives)))
    }

    /// Parse a package full name (`"name-version"`) as an `EQ` requirement.
    ///
    /// The input must not contain whitespace — `"numpy 1.8.1"` fails, only
    /// `"numpy-1.8.1"` (or `"numpy-1.8.1-1"` with an explicit build) is
    /// accepted.
    pub fn from_package_full_name(s: &str) -> Result<Self, SolverError> {
        if s.chars().any(char::is_whitespace) {
            return Err(SolverError::Solver(format!(
                "package full name {s:?} must not contain whitespace"
            )));
        }
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() < 2 {
            return Err(SolverError::Solver(format!(
                "package full name {s:?} has no version component"
            )));
        }

        if parts.len() >= 3 {
            let candidate = format!("{}-{}", parts[parts.len() - 2], parts[parts.len() - 1]);
            if let Ok(version) = V::parse(&candidate) {
                let name = parts[..parts.len() - 2].join("-");
                if !name.is_empty() {
                    return Ok(Self::new(name, MultiConstraint::new([Constraint::Eq(version)])));
                }
            }
        }

        let version = V::parse(parts[parts.len() - 1]).map_err(|_| {
            SolverError::Solver(format!("invalid version in package full name {s:?}"))
        })?;
        let name = parts[..parts.len() - 1].join("-");
        if name.is_empty() {
            return Err(SolverError::Solver(format!(
                "package full name {s:?} has no name component"
            )));
        }
        Ok(Self::new(name, MultiConstraint::new([Constraint::Eq(version)])))
    }
}

/// Split `clause` into `(name, rest)` where `rest` is the trimmed,
/// possibly-empty remainder (`""`, `"*"`, or an operator+version token).
fn split_name(clause: &str) -> Option<(&str, &str)> {
    let trimmed = clause.trim();
    let split_at = trimmed
        .find(|c: char| c.is_whitespace() || "<>=!^*".contains(c))
        .unwrap_or(trimmed.len());
    let name = trimmed[..split_at].trim();
    if name.is_empty() {
        return None;
    }
    let rest = trimmed[split_at..].trim();
    Some((name, rest))
}

fn parse_op_version<V: Version>(rest: &str) -> Result<Constraint<V>, SolverError> {
    let op = OPERATORS
        .iter()
        .find(|op| rest.starts_with(**op))
        .ok_or_else(|| {
            SolverError::InvalidDependencyString(format!("unknown operator in {rest:?}"))
        })?;
    let version_str = rest[op.len()..].trim();
    if version_str.is_empty() {
        return Err(SolverError::InvalidDependencyString(format!(
            "missing version after operator {op:?} in {rest:?}"
        )));
    }
    let version = V::parse(version_str)
        .map_err(|_| SolverError::InvalidDependencyString(format!(
            "invalid version {version_str:?} in {rest:?}"
        )))?;
    Ok(match *op {
        "<" => Constraint::Lt(version),
        "<=" => Constraint::Leq(version),
        ">" => Constraint::Gt(version),
        ">=" => Constraint::Geq(version),
        "==" => Constraint::Eq(version),
        "!=" => Constraint::Neq(version),
        "^=" => Constraint::EnpkgUpstreamMatch(version),
        _ => unreachable!("OPERATORS is exhaustive"),
    })
}

impl<V: Version> fmt::Display for Requirement<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constraints.is_any() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.constraints)
        }
    }
}

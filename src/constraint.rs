//! Primitive version predicates and their conjunction.

use std::fmt;

use crate::version::Version;

/// A single version predicate.
///
/// `EnpkgUpstreamMatch` (`^=`) matches any build of a given release
/// version; it is not equivalent to any bounded interval in general — see
/// [`Version::matches_upstream`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint<V> {
    /// Matches any version.
    Any,
    /// `> v`
    Gt(V),
    /// `>= v`
    Geq(V),
    /// `< v`
    Lt(V),
    /// `<= v`
    Leq(V),
    /// `== v` — exact match including build component.
    Eq(V),
    /// `!= v` — exact mismatch including build component.
    Neq(V),
    /// `^= v` — upstream match: any build of release `v`.
    EnpkgUpstreamMatch(V),
}

impl<V: Version> Constraint<V> {
    /// Test whether `candidate` satisfies this predicate.
    pub fn matches(&self, candidate: &V) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Gt(v) => candidate > v,
            Constraint::Geq(v) => candidate >= v,
            Constraint::Lt(v) => candidate < v,
            Constraint::Leq(v) => candidate <= v,
            Constraint::Eq(v) => candidate == v,
            Constraint::Neq(v) => candidate != v,
            Constraint::EnpkgUpstreamMatch(v) => candidate.matches_upstream(v),
        }
    }

    /// The operator string as used by the requirement grammar (`<`, `>=`,
    /// `^=`, …), or `None` for `Any` (which has no operator/version pair).
    pub fn operator_str(&self) -> Option<&'static str> {
        match self {
            Constraint::Any => None,
            Constraint::Gt(_) => Some(">"),
            Constraint::Geq(_) => Some(">="),
            Constraint::Lt(_) => Some("<"),
            Constraint::Leq(_) => Some("<="),
            Constraint::Eq(_) => Some("=="),
            Constraint::Neq(_) => Some("!="),
            Constraint::EnpkgUpstreamMatch(_) => Some("^="),
        }
    }
}

impl<V: Version> fmt::Display for Constraint<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Any => write!(f, "*"),
            Constraint::Gt(v)
            | Constraint::Geq(v)
            | Constraint::Lt(v)
            | Constraint::Leq(v)
            | Constraint::Eq(v)
            | Constraint::Neq(v)
            | Constraint::EnpkgUpstreamMatch(v) => {
                write!(f, "{} {}", self.operator_str().unwrap(), v)
            }
        }
    }
}

/// A conjunction of [`Constraint`]s.
///
/// Canonical form: `Any` never appears alongside another primitive (it is
/// dropped at construction unless the set would otherwise be empty).
/// Equality/hash are structural over the (canonicalized) set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiConstraint<V> {
    primitives: Vec<Constraint<V>>,
}

impl<V: Version> MultiConstraint<V> {
    /// Build a `MultiConstraint` from a sequence of primitives, dropping
    /// redundant `Any`s per the canonical-form invariant.
    pub fn new(primitives: impl IntoIterator<Item = Constraint<V>>) -> Self {
        let mut collected: Vec<Constraint<V>> = primitives.into_iter().collect();
        if collected.is_empty() {
            collected.push(Constraint::Any);
        } else if collected.len() > 1 {
            collected.retain(|c| !matches!(c, Constraint::Any));
            if collected.is_empty() {
                collected.push(Constraint::Any);
            }
        }
        Self { primitives: collected }
    }

    /// The any-constraint (no version restriction).
    pub fn any() -> Self {
        Self::new(std::iter::empty())
    }

    /// `true` iff `candidate` satisfies every primitive.
    pub fn matches(&self, candidate: &V) -> bool {
        self.primitives.iter().all(|p| p.matches(candidate))
    }

    /// The primitives making up this conjunction, in construction order.
    pub fn primitives(&self) -> &[Constraint<V>] {
        &self.primitives
    }

    /// `true` iff this constraint set carries no version restriction —
    /// the empty conjunction or a lone `Any`.
    pub fn is_any(&self) -> bool {
        matches!(self.primitives.as_slice(), [Constraint::Any])
    }
}

impl<V: Version> fmt::Display for MultiConstraint<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, primitive) in self.primitives.iter().enumerate() {
            if i > 0 {
                write!(f, ", {primitive}")?;
            } else {
                write!(f, "{primitive}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::EnpkgVersion;

    fn v(s: &str) -> EnpkgVersion {
        EnpkgVersion::parse(s).unwrap()
    }

    #[test]
    fn any_alone_is_any() {
        let m = MultiConstraint::<EnpkgVersion>::any();
        assert!(m.is_any());
        assert!(m.matches(&v("1.0.0")));
    }

    #[test]
    fn any_dropped_when_other_primitives_present() {
        let m = MultiConstraint::new([Constraint::Any, Constraint::Geq(v("1.0.0"))]);
        assert_eq!(m.primitives(), &[Constraint::Geq(v("1.0.0"))]);
    }

    #[test]
    fn conjunction_matches_requires_all() {
        let m = MultiConstraint::new([Constraint::Geq(v("1.8.1-3")), Constraint::Lt(v("1.9.0"))]);
        assert!(!m.matches(&v("1.8.1-2")));
        assert!(m.matches(&v("1.8.1-3")));
        assert!(m.matches(&v("1.8.2-1")));
        assert!(!m.matches(&v("1.9.0-1")));
    }

    #[test]
    fn upstream_match_ignores_build() {
        let m = MultiConstraint::new([Constraint::EnpkgUpstreamMatch(v("1.1.1"))]);
        assert!(m.matches(&v("1.1.1")));
        assert!(m.matches(&v("1.1.1-5")));
        assert!(!m.matches(&v("1.1.2")));
    }

    #[test]
    fn display_renders_operator_and_version() {
        let m = MultiConstraint::new([Constraint::Geq(v("1.8.1-3")), Constraint::Lt(v("1.9.0"))]);
        assert_eq!(m.to_string(), ">= 1.8.1-3, < 1.9.0");
    }

    #[test]
    fn display_any_is_star() {
        assert_eq!(MultiConstraint::<EnpkgVersion>::any().to_string(), "*");
    }
}

//! Version values: the one external collaborator this crate still has to
//! stand in for.
//!
//! The solver core is generic over any `V: Version` — total order, parsing,
//! and a `predecessor` operation are all the algebra needs. [`EnpkgVersion`]
//! is a concrete, self-contained implementation (named after the
//! `okonomiyaki.versions.EnpkgVersion` scheme the reference solver was built
//! against) so the crate is testable without a caller-supplied version
//! library.

use std::fmt;
use std::str::FromStr;

use crate::error::SolverError;

/// A totally ordered, parseable version value with a `predecessor`
/// operation.
///
/// Implemented by [`EnpkgVersion`]; callers with their own version scheme
/// (semver, a distro's dpkg-style comparator, …) may implement this trait
/// on their own type and use it with every other type in this crate.
pub trait Version: Ord + Clone + fmt::Debug + fmt::Display {
    /// Parse a version from its textual form.
    fn parse(s: &str) -> Result<Self, SolverError>
    where
        Self: Sized;

    /// The immediately smaller representable version.
    ///
    /// Used by [`crate::modifiers::transform_requirement`] to translate an
    /// `^=` (upstream match) relaxation into an inclusive upper bound.
    fn predecessor(&self) -> Self;

    /// Whether `self` and `other` belong to the same "upstream release",
    /// i.e. the match semantics of the `^= v` primitive.
    ///
    /// The default implementation falls back to equality, so version
    /// schemes with no build/release split behave like plain `EQ`.
    fn matches_upstream(&self, other: &Self) -> bool {
        self == other
    }

    /// The predecessor of the smallest version outside this release's
    /// `^=` match window — used by
    /// [`crate::modifiers::transform_requirement`] to translate `^= v`
    /// into `<= predecessor(v-upper)` under `allow_older`.
    ///
    /// The default implementation falls back to [`Version::predecessor`],
    /// which is exact for version schemes with no release/build split.
    fn predecessor_of_upstream_ceiling(&self) -> Self {
        self.predecessor()
    }
}

/// A release version plus build number: `<n>(.<n>)*(-<build>)?`.
///
/// `EQ` and `NEQ` compare the full value including `build`; `^=` (upstream
/// match) compares only `release`. Two versions with equal `release` but
/// different `build` are distinct under `EQ` but equivalent under `^=`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnpkgVersion {
    release: Vec<u64>,
    build: u64,
}

impl EnpkgVersion {
    /// Build number used when relaxing an `^=` constraint's implicit upper
    /// bound: `predecessor` of the next release's `-0` is `release-MAX_BUILD`.
    pub const MAX_BUILD: u64 = 9_999;

    /// Construct directly from parsed components.
    pub fn new(release: Vec<u64>, build: u64) -> Self {
        Self { release, build }
    }

    /// The release (upstream) component, ignoring build.
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// The build component.
    pub fn build(&self) -> u64 {
        self.build
    }

    /// Whether `self` and `other` share the same release component —
    /// the match semantics of `^= v`.
    pub fn same_release(&self, other: &Self) -> bool {
        self.release == other.release
    }

    fn decrement_release(release: &mut Vec<u64>) {
        for component in release.iter_mut().rev() {
            if *component > 0 {
                *component -= 1;
                return;
            }
        }
        // Every component is already zero: there is no smaller release to
        // borrow from. Drop the last component if there's more than one,
        // otherwise this is already the floor and we leave it unchanged.
        if release.len() > 1 {
            release.pop();
        }
    }
}

impl Version for EnpkgVersion {
    fn parse(s: &str) -> Result<Self, SolverError> {
        Self::from_str(s)
    }

    fn predecessor(&self) -> Self {
        if self.build > 0 {
            return Self {
                release: self.release.clone(),
                build: self.build - 1,
            };
        }
        let mut release = self.release.clone();
        Self::decrement_release(&mut release);
        Self {
            release,
            build: Self::MAX_BUILD,
        }
    }

    fn matches_upstream(&self, other: &Self) -> bool {
        self.same_release(other)
    }

    fn predecessor_of_upstream_ceiling(&self) -> Self {
        let mut release = self.release.clone();
        if let Some(last) = release.last_mut() {
            *last += 1;
        }
        Self { release, build: 0 }.predecessor()
    }
}

impl FromStr for EnpkgVersion {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (release_part, build_part) = match s.rsplit_once('-') {
            Some((release, build)) => (release, Some(build)),
            None => (s, None),
        };

        if release_part.is_empty() {
            return Err(SolverError::Solver(format!(
                "empty release component in version {s:?}"
            )));
        }

        let mut release = Vec::new();
        for component in release_part.split('.') {
            let n: u64 = component.parse().map_err(|_| {
                SolverError::Solver(format!("invalid version component {component:?} in {s:?}"))
            })?;
            release.push(n);
        }

        let build = match build_part {
            Some(b) => b
                .parse()
                .map_err(|_| SolverError::Solver(format!("invalid build number in {s:?}")))?,
            None => 0,
        };

        Ok(Self { release, build })
    }
}

impl fmt::Display for EnpkgVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.release.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{component}")?;
        }
        if self.build != 0 {
            write!(f, "-{}", self.build)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> EnpkgVersion {
        EnpkgVersion::parse(s).unwrap()
    }

    #[test]
    fn parses_release_and_build() {
        let parsed = v("1.8.1-3");
        assert_eq!(parsed.release(), &[1, 8, 1]);
        assert_eq!(parsed.build(), 3);
    }

    #[test]
    fn parses_bare_release() {
        let parsed = v("1.9.0");
        assert_eq!(parsed.release(), &[1, 9, 0]);
        assert_eq!(parsed.build(), 0);
    }

    #[test]
    fn display_omits_zero_build() {
        assert_eq!(v("1.9.0").to_string(), "1.9.0");
        assert_eq!(v("1.8.1-3").to_string(), "1.8.1-3");
    }

    #[test]
    fn ordering_by_release_then_build() {
        assert!(v("1.8.1-2") < v("1.8.1-3"));
        assert!(v("1.8.1-3") < v("1.8.2-1"));
        assert!(v("1.8.2-1") < v("1.9.0"));
    }

    #[test]
    fn same_release_ignores_build() {
        assert!(v("1.8.1-2").same_release(&v("1.8.1-3")));
        assert!(!v("1.8.1-2").same_release(&v("1.8.2-1")));
    }

    #[test]
    fn predecessor_decrements_build() {
        assert_eq!(v("1.1.1-1").predecessor(), v("1.1.1-0"));
    }

    #[test]
    fn predecessor_of_zero_build_borrows_release() {
        // predecessor(1.1.2-0) == 1.1.1-<max build>, matching the upper
        // bound translation used for `^=` relaxations (spec.md §4.2).
        let predecessor = v("1.1.2").predecessor();
        assert_eq!(predecessor.release(), &[1, 1, 1]);
        assert_eq!(predecessor.build(), EnpkgVersion::MAX_BUILD);
    }

    #[test]
    fn predecessor_of_upstream_ceiling_matches_spec_example() {
        // spec.md §4.2: for `^= 1.1.1` this is `1.1.1-<max-build>`.
        let ceiling = v("1.1.1").predecessor_of_upstream_ceiling();
        assert_eq!(ceiling.release(), &[1, 1, 1]);
        assert_eq!(ceiling.build(), EnpkgVersion::MAX_BUILD);
    }

    #[test]
    fn predecessor_of_all_zero_floors() {
        let floor = v("0.0.0").predecessor();
        assert_eq!(floor.release(), &[0, 0]);
        assert_eq!(floor.build(), EnpkgVersion::MAX_BUILD);
    }

    #[test]
    fn rejects_empty_release() {
        assert!(EnpkgVersion::parse("-3").is_err());
    }

    #[test]
    fn rejects_non_numeric_component() {
        assert!(EnpkgVersion::parse("1.a.0").is_err());
    }
}

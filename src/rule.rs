//! CNF clauses over signed package-id literals, reason-tagged for
//! diagnostics (spec.md §3, §4.3).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::package::Package;
use crate::pool::{Literal, Pool};
use crate::requirement::Requirement;

/// Why a [`Rule`] was emitted.
///
/// Carries the full vocabulary from spec.md §3 even though the generation
/// procedure in §4.3 only ever constructs a subset of these — the rest
/// (`InternalAllowUpdate`, `Internal`) are reserved for emitters a caller
/// may add on top of this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleReason {
    /// Reserved for solver-internal update-relaxation bookkeeping.
    InternalAllowUpdate,
    /// From an `install` job.
    JobInstall,
    /// From a `remove` job.
    JobRemove,
    /// From an `update` job.
    JobUpdate,
    /// A package's dependency requirement.
    PackageRequires,
    /// Two candidates share a package name (at most one may be installed).
    PackageSameName,
    /// Two distinct-named candidates implicitly obsolete each other.
    PackageImplicitObsoletes,
    /// At least one version of an already-installed package must remain.
    PackageInstalled,
    /// Reserved for solver-internal bookkeeping with no specific reason.
    Internal,
}

/// A CNF clause: a disjunction of signed package-id literals.
///
/// Equality and hashing are defined over the literal multiset only — the
/// `reason` and attached `requirement` are diagnostic metadata, not part
/// of the clause's identity, so that semantically identical clauses
/// collapse during rule-set deduplication (spec.md §3, invariant 5).
#[derive(Debug, Clone)]
pub struct Rule<V> {
    literals: Vec<Literal>,
    reason: RuleReason,
    requirement: Option<Requirement<V>>,
}

impl<V> Rule<V> {
    /// Build a rule from an unordered list of literals, canonicalizing
    /// (sorting) them so equivalent clauses collapse under equality.
    pub fn new(literals: impl IntoIterator<Item = Literal>, reason: RuleReason) -> Self {
        let mut literals: Vec<Literal> = literals.into_iter().collect();
        literals.sort_unstable();
        Self {
            literals,
            reason,
            requirement: None,
        }
    }

    /// Attach a requirement for diagnostic rendering.
    pub fn with_requirement(mut self, requirement: Requirement<V>) -> Self {
        self.requirement = Some(requirement);
        self
    }

    /// The clause's literals, in canonical (sorted) order.
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// This rule's reason tag.
    pub fn reason(&self) -> RuleReason {
        self.reason
    }

    /// The requirement attached for diagnostics, if any.
    pub fn requirement(&self) -> Option<&Requirement<V>> {
        self.requirement.as_ref()
    }

    /// `true` iff this is a unit clause (asserts a single literal).
    pub fn is_assertion(&self) -> bool {
        self.literals.len() == 1
    }
}

impl<V> PartialEq for Rule<V> {
    fn eq(&self, other: &Self) -> bool {
        self.literals == other.literals
    }
}

impl<V> Eq for Rule<V> {}

impl<V> Hash for Rule<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.literals.hash(state);
    }
}

/// Dependency rule: `(¬P ∨ D₁ ∨ … ∨ Dₙ)`, excluding `P` itself from the
/// dependency list. `reason` is [`RuleReason::PackageRequires`].
pub fn dependency_rule<P: Package, Po: Pool<P>>(
    pool: &Po,
    package: &P,
    dependencies: &[P],
) -> Rule<P::Version> {
    let package_id = pool.package_id(package) as Literal;
    let mut literals = vec![-package_id];
    for dependency in dependencies {
        let dependency_id = pool.package_id(dependency) as Literal;
        if dependency_id != package_id {
            literals.push(dependency_id);
        }
    }
    Rule::new(literals, RuleReason::PackageRequires)
}

/// Conflict rule between distinct packages: `(¬A ∨ ¬B)`. Returns `None`
/// when `issuer` and `provider` are the same package (no self-conflict).
pub fn conflict_rule<P: Package, Po: Pool<P>>(
    pool: &Po,
    issuer: &P,
    provider: &P,
    reason: RuleReason,
) -> Option<Rule<P::Version>> {
    let issuer_id = pool.package_id(issuer) as Literal;
    let provider_id = pool.package_id(provider) as Literal;
    if issuer_id == provider_id {
        return None;
    }
    Some(Rule::new([-issuer_id, -provider_id], reason))
}

/// Install-one-of rule over a non-empty candidate list: `(P₁ ∨ … ∨ Pₖ)`.
pub fn install_one_of_rule<P: Package, Po: Pool<P>>(
    pool: &Po,
    candidates: &[P],
    reason: RuleReason,
    requirement: Option<Requirement<P::Version>>,
) -> Rule<P::Version> {
    let literals = candidates.iter().map(|p| pool.package_id(p) as Literal);
    let rule = Rule::new(literals, reason);
    match requirement {
        Some(requirement) => rule.with_requirement(requirement),
        None => rule,
    }
}

/// Remove rule for one package: a unit clause `(¬P)`.
pub fn remove_rule<P: Package, Po: Pool<P>>(
    pool: &Po,
    package: &P,
    requirement: Option<Requirement<P::Version>>,
) -> Rule<P::Version> {
    let package_id = pool.package_id(package) as Literal;
    let rule = Rule::new([-package_id], RuleReason::JobRemove);
    match requirement {
        Some(requirement) => rule.with_requirement(requirement),
        None => rule,
    }
}

impl<V: fmt::Display> Rule<V> {
    /// Render this rule for diagnostics: a pipe-joined list of
    /// literal-rendered package strings, prefixed with reason framing.
    pub fn to_diagnostic_string<P, Po>(&self, pool: &Po) -> String
    where
        P: Package<Version = V>,
        Po: Pool<P>,
    {
        let rendered: Vec<String> = self
            .literals
            .iter()
            .map(|&literal| pool.id_to_string(literal))
            .collect();
        let joined = rendered.join(" | ");

        let description = match self.reason {
            RuleReason::JobInstall => format!("Install command rule ({joined})"),
            RuleReason::JobUpdate => format!("Update to latest command rule ({joined})"),
            RuleReason::JobRemove => format!("Remove command rule ({joined})"),
            RuleReason::PackageSameName => format!("Can only install one of: ({joined})"),
            RuleReason::PackageInstalled => format!("Should install one of: ({joined})"),
            RuleReason::PackageRequires => {
                let source = rendered.first().map(|s| s[1..].to_string()).unwrap_or_default();
                let rest = rendered[1..].join(" | ");
                format!("{source} requires ({rest})")
            }
            _ => joined,
        };

        match &self.requirement {
            Some(requirement) => format!("Requirement: '{requirement}'\n\t{description}"),
            None => description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::InMemoryPool;
    use crate::version::EnpkgVersion;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestPackage {
        name: String,
        version: EnpkgVersion,
    }

    impl Package for TestPackage {
        type Version = EnpkgVersion;
        fn name(&self) -> &str {
            &self.name
        }
        fn version(&self) -> &EnpkgVersion {
            &self.version
        }
        fn dependencies(&self) -> Vec<Requirement<EnpkgVersion>> {
            Vec::new()
        }
    }

    fn pkg(name: &str, version: &str) -> TestPackage {
        TestPackage {
            name: name.to_string(),
            version: EnpkgVersion::parse(version).unwrap(),
        }
    }

    #[test]
    fn rules_with_same_literal_multiset_are_equal() {
        let a = Rule::<EnpkgVersion>::new([1, -2, 3], RuleReason::PackageRequires);
        let b = Rule::<EnpkgVersion>::new([3, 1, -2], RuleReason::JobInstall);
        assert_eq!(a, b);
        assert_eq!(a.literals(), b.literals());
    }

    #[test]
    fn literals_are_sorted_canonically() {
        let rule = Rule::<EnpkgVersion>::new([3, -1, 2], RuleReason::Internal);
        assert_eq!(rule.literals(), &[-1, 2, 3]);
    }

    #[test]
    fn unit_clause_is_an_assertion() {
        let rule = Rule::<EnpkgVersion>::new([-5], RuleReason::JobRemove);
        assert!(rule.is_assertion());
    }

    #[test]
    fn dependency_rule_excludes_self() {
        let mut pool = InMemoryPool::new();
        let a = pkg("A", "1.0.0");
        let b = pkg("B", "1.0.0");
        pool.add(a.clone());
        pool.add(b.clone());

        let rule = dependency_rule(&pool, &a, &[a.clone(), b.clone()]);
        let a_id = pool.package_id(&a) as Literal;
        let b_id = pool.package_id(&b) as Literal;
        assert_eq!(rule.literals(), &{
            let mut l = [-a_id, b_id];
            l.sort_unstable();
            l
        });
    }

    #[test]
    fn conflict_rule_is_none_for_self_conflict() {
        let mut pool = InMemoryPool::new();
        let a = pkg("A", "1.0.0");
        pool.add(a.clone());
        assert!(conflict_rule(&pool, &a, &a, RuleReason::PackageSameName).is_none());
    }

    #[test]
    fn diagnostic_rendering_matches_reason_framing() {
        let mut pool = InMemoryPool::new();
        let a = pkg("numpy", "1.8.1-1");
        let b = pkg("numpy", "1.7.0-1");
        pool.add(a.clone());
        pool.add(b.clone());
        let rule = conflict_rule(&pool, &a, &b, RuleReason::PackageSameName).unwrap();
        let rendered = rule.to_diagnostic_string::<TestPackage, _>(&pool);
        assert!(rendered.starts_with("Can only install one of: ("));
    }
}

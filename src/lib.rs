//! Requirement algebra, CNF rule generation, and a watched-literal SAT
//! engine for resolving package dependencies.
//!
//! Three independent layers, wired together by the caller:
//!
//! 1. [`version`], [`constraint`], [`requirement`], [`modifiers`] — a
//!    generic version/constraint algebra (any `V: Version`).
//! 2. [`package`], [`pool`], [`job`], [`rule`], [`generator`] — turns a
//!    package universe plus a job [`Request`] into a deduplicated,
//!    insertion-ordered CNF [`Rule`] set.
//! 3. [`sat`] — enumerates every satisfying model of a clause set.
//!
//! None of these layers depend on I/O; callers own fetching package
//! metadata and applying a chosen model to disk.

mod constraint;
mod error;
mod generator;
mod job;
mod modifiers;
mod package;
mod pool;
mod requirement;
mod rule;
mod sat;
mod version;

pub use constraint::{Constraint, MultiConstraint};
pub use error::{Result, SolverError};
pub use generator::RuleGenerator;
pub use job::{Job, JobKind, Request};
pub use modifiers::transform_requirement;
pub use package::{InstalledMap, Package};
pub use pool::{InMemoryPool, Literal, PackageId, Pool};
pub use requirement::Requirement;
pub use rule::{Rule, RuleReason};
pub use sat::{Assignment, Clause, SatIter, SatSolver, Watchlist};
pub use version::{EnpkgVersion, Version};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestPackage {
        name: String,
        version: EnpkgVersion,
        deps: Vec<Requirement<EnpkgVersion>>,
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
            self.deps.clone()
        }
    }

    fn pkg(name: &str, version: &str, deps: &[&str]) -> TestPackage {
        TestPackage {
            name: name.to_string(),
            version: EnpkgVersion::parse(version).unwrap(),
            deps: deps.iter().map(|d| Requirement::parse(d).unwrap()).collect(),
        }
    }

    /// End-to-end: a pool, an install job with a transitive dependency, a
    /// generated rule set, and a SAT solve over it.
    #[test]
    fn install_with_dependency_resolves_to_a_single_model() {
        let mut pool = InMemoryPool::new();
        pool.add(pkg("numpy", "1.8.1-1", &[]));
        pool.add(pkg("scipy", "0.14.0", &["numpy >= 1.8.0"]));

        let installed = InstalledMap::new();
        let request = Request::new().with(Job::install(Requirement::parse("scipy").unwrap()));

        let mut generator = RuleGenerator::new(&pool, &installed);
        let rules = generator.generate(&request).unwrap();

        let clauses: Vec<Clause> = rules.iter().map(|r| r.literals().to_vec()).collect();
        let solver = SatSolver::new(clauses);
        let models: Vec<Assignment> = solver.solve().collect();

        assert_eq!(models.len(), 1);
        let model = &models[0];
        let numpy_id = pool.package_id(&pkg("numpy", "1.8.1-1", &[]));
        let scipy_id = pool.package_id(&pkg("scipy", "0.14.0", &["numpy >= 1.8.0"]));
        assert_eq!(model.get(numpy_id), Some(true));
        assert_eq!(model.get(scipy_id), Some(true));
    }

    /// Same-name candidates conflict: installing "numpy" with two versions
    /// in the pool yields models that each pick exactly one version.
    #[test]
    fn same_name_conflict_yields_one_version_per_model() {
        let mut pool = InMemoryPool::new();
        pool.add(pkg("numpy", "1.8.1-1", &[]));
        pool.add(pkg("numpy", "1.7.0-1", &[]));

        let installed = InstalledMap::new();
        let request = Request::new().with(Job::install(Requirement::parse("numpy").unwrap()));

        let mut generator = RuleGenerator::new(&pool, &installed);
        let rules = generator.generate(&request).unwrap();
        let clauses: Vec<Clause> = rules.iter().map(|r| r.literals().to_vec()).collect();
        let solver = SatSolver::new(clauses);

        let new_id = pool.package_id(&pkg("numpy", "1.8.1-1", &[]));
        let old_id = pool.package_id(&pkg("numpy", "1.7.0-1", &[]));

        for model in solver.solve() {
            let installed_count = [new_id, old_id]
                .iter()
                .filter(|&&id| model.get(id) == Some(true))
                .count();
            assert_eq!(installed_count, 1, "expected exactly one numpy version per model");
        }
    }

    /// A contradictory request (remove and require the same already
    /// installed package) is unsatisfiable: the SAT engine yields no model.
    #[test]
    fn conflicting_jobs_are_unsatisfiable() {
        let mut pool = InMemoryPool::new();
        pool.add(pkg("numpy", "1.8.1-1", &[]));
        let mut installed = InstalledMap::new();
        installed.insert(pkg("numpy", "1.8.1-1", &[]));

        let request = Request::new()
            .with(Job::remove(Requirement::parse("numpy").unwrap()))
            .with(Job::install(Requirement::parse("numpy").unwrap()));

        let mut generator = RuleGenerator::new(&pool, &installed);
        let rules = generator.generate(&request).unwrap();
        let clauses: Vec<Clause> = rules.iter().map(|r| r.literals().to_vec()).collect();
        let solver = SatSolver::new(clauses);

        assert!(solver.solve().next().is_none());
    }

    /// `transform_requirement` under `allow_any` collapses every relaxable
    /// primitive to `Any`, keeping only `!=`, and the relaxed requirement
    /// still filters the pool correctly.
    #[test]
    fn relaxed_requirement_feeds_cleanly_into_the_pool() {
        let req = Requirement::<EnpkgVersion>::parse("MKL >= 1.2.1-2, MKL != 2.3.1-1").unwrap();
        let allow_any: HashSet<String> = ["MKL".to_string()].into_iter().collect();
        let relaxed = transform_requirement(&req, &HashSet::new(), &HashSet::new(), &allow_any);

        let mut pool = InMemoryPool::new();
        pool.add(pkg("MKL", "2.3.1-1", &[]));
        pool.add(pkg("MKL", "1.0.0", &[]));

        let matches = pool.what_provides(&relaxed);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].version().to_string(), "1.0.0");
    }
}

//! Translates a package pool, a job request, and an installed-package map
//! into a deduplicated, insertion-ordered CNF rule set (spec.md §4.3).

use std::collections::{HashSet, VecDeque};

use indexmap::IndexSet;
use log::{debug, warn};

use crate::error::SolverError;
use crate::job::{JobKind, Request};
use crate::package::{InstalledMap, Package};
use crate::pool::{PackageId, Pool};
use crate::rule::{conflict_rule, dependency_rule, install_one_of_rule, remove_rule, Rule, RuleReason};

/// Walks a dependency graph and a job request, emitting [`Rule`]s.
///
/// Packages are expanded breadth-first starting from every installed
/// package and every job's candidates; each package id is expanded at most
/// once (`added_package_ids`), matching the reference generator's
/// `added_package_ids` set. Rules are stored in an [`IndexSet`] so the
/// final rule list is both duplicate-free (by literal multiset) and in
/// first-insertion order, which downstream diagnostics rely on.
pub struct RuleGenerator<'a, P: Package, Po: Pool<P>> {
    pool: &'a Po,
    installed_map: &'a InstalledMap<P>,
    rules: IndexSet<Rule<P::Version>>,
    added_package_ids: HashSet<PackageId>,
}

impl<'a, P: Package, Po: Pool<P>> RuleGenerator<'a, P, Po> {
    /// Build a generator over `pool` and `installed_map`. Call
    /// [`Self::generate`] with a request to produce the rule set.
    pub fn new(pool: &'a Po, installed_map: &'a InstalledMap<P>) -> Self {
        Self {
            pool,
            installed_map,
            rules: IndexSet::new(),
            added_package_ids: HashSet::new(),
        }
    }

    /// Generate the full rule set for `request`: installed-package rules
    /// first (in installed-map order), then job rules (in request order).
    pub fn generate(&mut self, request: &Request<P::Version>) -> Result<Vec<Rule<P::Version>>, SolverError> {
        self.added_package_ids.clear();
        self.rules.clear();

        for package in self.installed_map.values().cloned().collect::<Vec<_>>() {
            self.add_installed_package_rules(&package)?;
            self.add_package_rules(package)?;
        }
        self.add_job_rules(request)?;

        Ok(self.rules.iter().cloned().collect())
    }

    fn add_rule(&mut self, rule: Option<Rule<P::Version>>) {
        if let Some(rule) = rule {
            self.rules.insert(rule);
        }
    }

    fn add_dependencies_rules(&mut self, package: &P, work_queue: &mut VecDeque<P>) -> Result<(), SolverError> {
        let mut dependencies = package.dependencies();
        dependencies.sort_by(|a, b| a.name().cmp(b.name()));

        for requirement in dependencies {
            let candidates = self.pool.what_provides(&requirement);
            if candidates.is_empty() {
                let message = format!(
                    "no candidates found for requirement {requirement:?}, needed for dependency of {package:?}"
                );
                warn!("{message}");
                return Err(SolverError::Solver(message));
            }

            let rule = dependency_rule(self.pool, package, &candidates);
            debug!(
                "package {:?} requires {:?} ({} candidates)",
                package.name(),
                requirement.name(),
                candidates.len()
            );
            self.add_rule(Some(rule));

            for candidate in candidates {
                work_queue.push_back(candidate);
            }
        }
        Ok(())
    }

    /// Breadth-first expansion of `package` and everything it (transitively)
    /// depends on, emitting dependency rules and same-name/implicit-obsoletes
    /// conflict rules along the way.
    fn add_package_rules(&mut self, package: P) -> Result<(), SolverError> {
        let mut work_queue = VecDeque::new();
        work_queue.push_back(package);

        while let Some(current) = work_queue.pop_front() {
            let current_id = self.pool.package_id(&current);
            if self.added_package_ids.insert(current_id) {
                self.add_dependencies_rules(&current, &mut work_queue)?;

                let same_name = crate::requirement::Requirement::any(current.name());
                for provider in self.pool.what_provides(&same_name) {
                    let provider_id = self.pool.package_id(&provider);
                    if provider_id == current_id {
                        continue;
                    }
                    let reason = if provider.name() == current.name() {
                        RuleReason::PackageSameName
                    } else {
                        RuleReason::PackageImplicitObsoletes
                    };
                    let rule = conflict_rule(self.pool, &current, &provider, reason);
                    self.add_rule(rule);
                }
            }
        }
        Ok(())
    }

    fn is_installed(&self, package: &P) -> bool {
        self.installed_map
            .get(package.name())
            .is_some_and(|installed| self.pool.package_id(installed) == self.pool.package_id(package))
    }

    fn add_installed_package_rules(&mut self, package: &P) -> Result<(), SolverError> {
        for other in self.pool.packages_by_name(package.name()) {
            self.add_package_rules(other)?;
        }
        Ok(())
    }

    fn add_install_job_rules(
        &mut self,
        requirement: &crate::requirement::Requirement<P::Version>,
    ) -> Result<(), SolverError> {
        let packages = self.pool.what_provides(requirement);
        if packages.is_empty() {
            return Ok(());
        }
        for package in &packages {
            if !self.is_installed(package) {
                self.add_package_rules(package.clone())?;
            }
        }
        let rule = install_one_of_rule(self.pool, &packages, RuleReason::JobInstall, Some(requirement.clone()));
        self.add_rule(Some(rule));
        Ok(())
    }

    fn add_remove_job_rules(
        &mut self,
        requirement: &crate::requirement::Requirement<P::Version>,
    ) -> Result<(), SolverError> {
        for package in self.pool.what_provides(requirement) {
            let rule = remove_rule(self.pool, &package, Some(requirement.clone()));
            self.add_rule(Some(rule));
        }
        Ok(())
    }

    fn add_update_job_rules(
        &mut self,
        requirement: &crate::requirement::Requirement<P::Version>,
    ) -> Result<(), SolverError> {
        let packages = self.pool.what_provides(requirement);
        let mut best: Option<&P> = None;
        for package in &packages {
            match best {
                None => best = Some(package),
                Some(current_best) if package.version() > current_best.version() => best = Some(package),
                _ => {}
            }
        }
        let Some(package) = best.cloned() else {
            return Ok(());
        };

        self.add_package_rules(package.clone())?;
        let package_id = self.pool.package_id(&package) as crate::pool::Literal;
        let rule = Rule::new([package_id], RuleReason::JobUpdate).with_requirement(requirement.clone());
        self.add_rule(Some(rule));
        Ok(())
    }

    fn add_job_rules(&mut self, request: &Request<P::Version>) -> Result<(), SolverError> {
        for job in request.jobs() {
            match job.kind() {
                JobKind::Install => self.add_install_job_rules(job.requirement())?,
                JobKind::Remove => self.add_remove_job_rules(job.requirement())?,
                JobKind::Update => self.add_update_job_rules(job.requirement())?,
            }
        }
        Ok(())
    }
}

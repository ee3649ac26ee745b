//! Jobs: the user-facing requests a [`crate::generator::RuleGenerator`]
//! translates into rules (spec.md §4.3).

use crate::requirement::Requirement;
use crate::version::Version;

/// What a [`Job`] asks the solver to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// Install a package satisfying the requirement.
    Install,
    /// Remove every installed package matching the requirement.
    Remove,
    /// Update an installed package to its newest version still satisfying
    /// the requirement.
    Update,
}

/// A single request against a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job<V: Version> {
    kind: JobKind,
    requirement: Requirement<V>,
}

impl<V: Version> Job<V> {
    /// Build a job of the given kind over `requirement`.
    pub fn new(kind: JobKind, requirement: Requirement<V>) -> Self {
        Self { kind, requirement }
    }

    /// Convenience constructor for an install job.
    pub fn install(requirement: Requirement<V>) -> Self {
        Self::new(JobKind::Install, requirement)
    }

    /// Convenience constructor for a remove job.
    pub fn remove(requirement: Requirement<V>) -> Self {
        Self::new(JobKind::Remove, requirement)
    }

    /// Convenience constructor for an update job.
    pub fn update(requirement: Requirement<V>) -> Self {
        Self::new(JobKind::Update, requirement)
    }

    /// This job's kind.
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// This job's requirement.
    pub fn requirement(&self) -> &Requirement<V> {
        &self.requirement
    }
}

/// An ordered sequence of jobs to resolve together.
///
/// Order matters: the rule generator walks jobs in this order, so when two
/// jobs disagree (e.g. install and remove the same name) the rule set ends
/// up unsatisfiable rather than silently favoring one, and diagnostics cite
/// jobs by position.
#[derive(Debug, Clone, Default)]
pub struct Request<V: Version> {
    jobs: Vec<Job<V>>,
}

impl<V: Version> Request<V> {
    /// An empty request.
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Append a job, returning `self` for chaining.
    pub fn with(mut self, job: Job<V>) -> Self {
        self.jobs.push(job);
        self
    }

    /// Append a job in place.
    pub fn push(&mut self, job: Job<V>) {
        self.jobs.push(job);
    }

    /// The jobs, in request order.
    pub fn jobs(&self) -> &[Job<V>] {
        &self.jobs
    }
}

impl<V: Version> FromIterator<Job<V>> for Request<V> {
    fn from_iter<T: IntoIterator<Item = Job<V>>>(iter: T) -> Self {
        Self {
            jobs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::EnpkgVersion;

    #[test]
    fn request_preserves_job_order() {
        let r1 = Requirement::<EnpkgVersion>::parse("numpy >= 1.8.1").unwrap();
        let r2 = Requirement::<EnpkgVersion>::parse("scipy").unwrap();
        let request = Request::new()
            .with(Job::install(r1.clone()))
            .with(Job::remove(r2.clone()));

        assert_eq!(request.jobs().len(), 2);
        assert_eq!(request.jobs()[0].kind(), JobKind::Install);
        assert_eq!(request.jobs()[1].kind(), JobKind::Remove);
    }

    #[test]
    fn convenience_constructors_set_expected_kind() {
        let req = Requirement::<EnpkgVersion>::any("numpy");
        assert_eq!(Job::install(req.clone()).kind(), JobKind::Install);
        assert_eq!(Job::remove(req.clone()).kind(), JobKind::Remove);
        assert_eq!(Job::update(req).kind(), JobKind::Update);
    }
}

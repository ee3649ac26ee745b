//! Example: resolve a small scientific-Python style dependency set.
//!
//! Models a handful of packages with transitive dependencies and
//! multiple versions per name, then walks every satisfying model the
//! SAT engine finds for an install request.

use depsolve_core::{
    EnpkgVersion, InMemoryPool, InstalledMap, Job, Package, Pool, Request, RuleGenerator,
    Requirement, SatSolver,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pkg {
    name: String,
    version: EnpkgVersion,
    deps: Vec<Requirement<EnpkgVersion>>,
}

impl Package for Pkg {
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

fn pkg(name: &str, version: &str, deps: &[&str]) -> Pkg {
    Pkg {
        name: name.to_string(),
        version: EnpkgVersion::parse(version).unwrap(),
        deps: deps.iter().map(|d| Requirement::parse(d).unwrap()).collect(),
    }
}

fn build_pool() -> InMemoryPool<Pkg> {
    let mut pool = InMemoryPool::new();
    pool.add(pkg("numpy", "1.8.1-1", &[]));
    pool.add(pkg("numpy", "1.7.0-1", &[]));
    pool.add(pkg("scipy", "0.14.0", &["numpy >= 1.8.0"]));
    pool.add(pkg("pandas", "0.15.0", &["numpy >= 1.7.0"]));
    pool.add(pkg("matplotlib", "1.4.0", &["numpy >= 1.7.0"]));
    pool
}

fn main() {
    env_logger::init();

    let pool = build_pool();
    let installed = InstalledMap::new();

    let request = Request::new()
        .with(Job::install(Requirement::parse("scipy").unwrap()))
        .with(Job::install(Requirement::parse("pandas").unwrap()))
        .with(Job::install(Requirement::parse("matplotlib").unwrap()));

    println!("Request:");
    for job in request.jobs() {
        println!("  {:?} {}", job.kind(), job.requirement());
    }

    let mut generator = RuleGenerator::new(&pool, &installed);
    let rules = match generator.generate(&request) {
        Ok(rules) => rules,
        Err(err) => {
            eprintln!("rule generation failed: {err}");
            return;
        }
    };
    println!("\nGenerated {} rules.", rules.len());

    let clauses = rules.iter().map(|r| r.literals().to_vec()).collect::<Vec<_>>();
    let solver = SatSolver::new(clauses);

    println!("\nModels:");
    for (i, model) in solver.solve().enumerate() {
        let mut installed_names: Vec<String> = model
            .iter()
            .filter(|&(_, installed)| installed)
            .map(|(id, _)| pool.id_to_string(id as depsolve_core::Literal)[1..].to_string())
            .collect();
        installed_names.sort();
        println!("  model {}: {}", i + 1, installed_names.join(", "));
    }
}

//! Example: demonstrate dependency resolution **failure modes**.
//!
//! Each scenario builds a tiny pool, attempts to generate rules and solve
//! them, and prints why no model exists — either because rule generation
//! itself fails (no candidates for a dependency) or because the generated
//! clause set is unsatisfiable.

use depsolve_core::{
    EnpkgVersion, InMemoryPool, InstalledMap, Job, Package, Request, RuleGenerator, Requirement,
    SatSolver,
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

fn try_solve(title: &str, pool: &InMemoryPool<Pkg>, installed: &InstalledMap<Pkg>, request: &Request<EnpkgVersion>) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));

    let mut generator = RuleGenerator::new(pool, installed);
    let rules = match generator.generate(request) {
        Ok(rules) => rules,
        Err(err) => {
            println!("  rule generation failed: {err}");
            return;
        }
    };

    let clauses = rules.iter().map(|r| r.literals().to_vec()).collect::<Vec<_>>();
    let solver = SatSolver::new(clauses);
    match solver.solve().next() {
        Some(_) => println!("  resolved successfully (unexpected for this example)"),
        None => {
            println!("  unsatisfiable; contributing rules:");
            for rule in &rules {
                println!("    {}", rule.to_diagnostic_string(pool));
            }
        }
    }
}

fn main() {
    env_logger::init();

    // 1. Missing dependency — no candidates at all.
    {
        let mut pool = InMemoryPool::new();
        pool.add(pkg("hello", "1.0", &["nonexistent"]));
        let installed = InstalledMap::new();
        let request = Request::new().with(Job::install(Requirement::parse("hello").unwrap()));
        try_solve(
            "1. Missing dependency — no candidates at all",
            &pool,
            &installed,
            &request,
        );
    }

    // 2. Version conflict — needs >=2.0, only 1.0 exists.
    {
        let mut pool = InMemoryPool::new();
        pool.add(pkg("foo", "1.0", &[]));
        pool.add(pkg("myapp", "1.0", &["foo >= 2.0"]));
        let installed = InstalledMap::new();
        let request = Request::new().with(Job::install(Requirement::parse("myapp").unwrap()));
        try_solve(
            "2. Version conflict — needs >=2.0, only 1.0 exists",
            &pool,
            &installed,
            &request,
        );
    }

    // 3. Same-name conflict plus a requirement that insists on both versions.
    {
        let mut pool = InMemoryPool::new();
        pool.add(pkg("numpy", "1.8.1-1", &[]));
        pool.add(pkg("numpy", "1.7.0-1", &[]));
        let installed = InstalledMap::new();
        let request = Request::new()
            .with(Job::install(Requirement::parse("numpy == 1.8.1-1").unwrap()))
            .with(Job::install(Requirement::parse("numpy == 1.7.0-1").unwrap()));
        try_solve(
            "3. Conflicting install jobs — two exact versions of the same name",
            &pool,
            &installed,
            &request,
        );
    }

    // 4. Installed package conflicts with a remove-then-require sequence.
    {
        let mut pool = InMemoryPool::new();
        pool.add(pkg("bar", "1.0", &[]));
        let mut installed = InstalledMap::new();
        installed.insert(pkg("bar", "1.0", &[]));
        let request = Request::new()
            .with(Job::remove(Requirement::parse("bar").unwrap()))
            .with(Job::install(Requirement::parse("bar").unwrap()));
        try_solve(
            "4. Remove and install the same installed package",
            &pool,
            &installed,
            &request,
        );
    }

    // 5. Remove-all-versions vs install-one-of, over a same-name pair.
    {
        let mut pool = InMemoryPool::new();
        pool.add(pkg("numpy", "1.8.1-1", &[]));
        pool.add(pkg("numpy", "1.7.0-1", &[]));
        let installed = InstalledMap::new();
        let request = Request::new()
            .with(Job::remove(Requirement::parse("numpy").unwrap()))
            .with(Job::install(Requirement::parse("numpy").unwrap()));
        try_solve(
            "5. Remove every numpy candidate while also requiring one installed",
            &pool,
            &installed,
            &request,
        );
    }
}

//! The package universe: lookup by requirement, bijective package ids.

use std::collections::HashMap;

use crate::package::Package;
use crate::requirement::Requirement;

/// A package's variable id in the SAT encoding. Ids are 1-based positive
/// integers; literals (signed) are built from them by the rule generator.
pub type PackageId = u32;

/// A signed literal: positive means "install this package", negative
/// means "do not install it".
pub type Literal = i64;

/// Indexed package set (spec.md §3).
///
/// `Pool` is the one collaborator spec.md treats as external/assumed; this
/// crate ships [`InMemoryPool`] so the rule generator and SAT engine are
/// independently testable.
pub trait Pool<P: Package> {
    /// All packages named `requirement.name()` whose version satisfies
    /// `requirement.constraints()`.
    fn what_provides(&self, requirement: &Requirement<P::Version>) -> Vec<P>;

    /// The bijective id for `package`. Panics if `package` was never
    /// interned into this pool — callers only ever pass packages obtained
    /// from the pool itself.
    fn package_id(&self, package: &P) -> PackageId;

    /// Render a literal for diagnostics: a sign character followed by the
    /// package's `name-version` string.
    fn id_to_string(&self, literal: Literal) -> String;

    /// Every package sharing `name`, used for same-name conflict rules.
    fn packages_by_name(&self, name: &str) -> Vec<P>;
}

/// A simple, fully in-memory [`Pool`] backed by a `Vec` arena.
///
/// Packages are deduplicated by `(name, version)` on insertion so that
/// `package_id` stays bijective even if the same logical package is added
/// twice.
#[derive(Debug, Clone)]
pub struct InMemoryPool<P: Package> {
    packages: Vec<P>,
    id_by_key: HashMap<(String, String), PackageId>,
    ids_by_name: HashMap<String, Vec<PackageId>>,
}

impl<P: Package> InMemoryPool<P> {
    /// An empty pool.
    pub fn new() -> Self {
        Self {
            packages: Vec::new(),
            id_by_key: HashMap::new(),
            ids_by_name: HashMap::new(),
        }
    }

    /// Intern `package`, returning its id (existing id if already present).
    pub fn add(&mut self, package: P) -> PackageId {
        let key = (package.name().to_string(), package.version().to_string());
        if let Some(&id) = self.id_by_key.get(&key) {
            return id;
        }
        self.packages.push(package.clone());
        let id = self.packages.len() as PackageId;
        self.id_by_key.insert(key, id);
        self.ids_by_name
            .entry(package.name().to_string())
            .or_default()
            .push(id);
        id
    }

    fn package_at(&self, id: PackageId) -> &P {
        &self.packages[(id - 1) as usize]
    }
}

impl<P: Package> Default for InMemoryPool<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Package> FromIterator<P> for InMemoryPool<P> {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        let mut pool = Self::new();
        for package in iter {
            pool.add(package);
        }
        pool
    }
}

impl<P: Package> Pool<P> for InMemoryPool<P> {
    fn what_provides(&self, requirement: &Requirement<P::Version>) -> Vec<P> {
        self.ids_by_name
            .get(requirement.name())
            .into_iter()
            .flatten()
            .map(|&id| self.package_at(id))
            .filter(|p| requirement.matches(p.version()))
            .cloned()
            .collect()
    }

    fn package_id(&self, package: &P) -> PackageId {
        let key = (package.name().to_string(), package.version().to_string());
        *self
            .id_by_key
            .get(&key)
            .expect("package_id called on a package not interned in this pool")
    }

    fn id_to_string(&self, literal: Literal) -> String {
        let id = literal.unsigned_abs() as PackageId;
        let package = self.package_at(id);
        let sign = if literal < 0 { '-' } else { '+' };
        format!("{sign}{}-{}", package.name(), package.version())
    }

    fn packages_by_name(&self, name: &str) -> Vec<P> {
        self.ids_by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(|&id| self.package_at(id).clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn add_is_idempotent_and_bijective() {
        let mut pool = InMemoryPool::new();
        let a = pool.add(pkg("numpy", "1.8.1-1"));
        let b = pool.add(pkg("numpy", "1.8.1-1"));
        let c = pool.add(pkg("numpy", "1.8.2-1"));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn what_provides_filters_by_constraint() {
        let pool: InMemoryPool<TestPackage> = [
            pkg("numpy", "1.8.1-2"),
            pkg("numpy", "1.8.1-3"),
            pkg("numpy", "1.8.2-1"),
            pkg("numpy", "1.9.0-1"),
        ]
        .into_iter()
        .collect();

        let req = Requirement::parse("numpy >= 1.8.1-3, numpy < 1.9.0").unwrap();
        let mut versions: Vec<String> = pool
            .what_provides(&req)
            .iter()
            .map(|p| p.version().to_string())
            .collect();
        versions.sort();
        assert_eq!(versions, vec!["1.8.1-3", "1.8.2-1"]);
    }

    #[test]
    fn id_to_string_renders_sign_and_full_name() {
        let mut pool = InMemoryPool::new();
        pool.add(pkg("numpy", "1.8.1-1"));
        let id = pool.package_id(&pkg("numpy", "1.8.1-1"));
        assert_eq!(pool.id_to_string(id as Literal), "+numpy-1.8.1-1");
        assert_eq!(pool.id_to_string(-(id as Literal)), "-numpy-1.8.1-1");
    }

    #[test]
    fn packages_by_name_returns_all_versions() {
        let pool: InMemoryPool<TestPackage> =
            [pkg("numpy", "1.8.1-1"), pkg("numpy", "1.8.2-1"), pkg("scipy", "0.14.0")]
                .into_iter()
                .collect();
        assert_eq!(pool.packages_by_name("numpy").len(), 2);
        assert_eq!(pool.packages_by_name("scipy").len(), 1);
        assert!(pool.packages_by_name("pandas").is_empty());
    }
}

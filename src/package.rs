//! The package trait and the installed-state map.

use std::fmt;

use indexmap::IndexMap;

use crate::requirement::Requirement;
use crate::version::Version;

/// A candidate package, opaque to the solver core beyond name, version,
/// and declared dependencies.
///
/// Implementations are expected to be cheap to clone (an id/handle into a
/// repository, not a full package description) since the rule generator
/// clones packages freely while walking the dependency graph.
pub trait Package: Clone + fmt::Debug {
    /// The version type this package is parameterized over.
    type Version: Version;

    /// The package's name (the axis `Pool::what_provides` matches on).
    fn name(&self) -> &str;

    /// The package's version.
    fn version(&self) -> &Self::Version;

    /// This package's declared dependencies, each convertible to a
    /// [`Requirement`].
    fn dependencies(&self) -> Vec<Requirement<Self::Version>>;
}

/// Packages currently installed on the system.
///
/// Insertion order is part of the determinism contract (spec.md §3/§5):
/// rule generation iterates installed packages in the order they were
/// added here.
#[derive(Debug, Clone)]
pub struct InstalledMap<P: Package> {
    by_name: IndexMap<String, P>,
}

impl<P: Package> InstalledMap<P> {
    /// An empty installed-package map.
    pub fn new() -> Self {
        Self {
            by_name: IndexMap::new(),
        }
    }

    /// Record `package` as installed, keyed by its name.
    ///
    /// Re-inserting an existing name updates its entry in place without
    /// changing its position in iteration order, matching
    /// [`indexmap::IndexMap::insert`].
    pub fn insert(&mut self, package: P) {
        self.by_name.insert(package.name().to_string(), package);
    }

    /// Look up the installed package with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&P> {
        self.by_name.get(name)
    }

    /// `true` iff a package with this name is installed.
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterate installed packages in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &P> {
        self.by_name.values()
    }

    /// Number of installed packages.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// `true` iff no packages are installed.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl<P: Package> Default for InstalledMap<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Package> FromIterator<P> for InstalledMap<P> {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        let mut map = Self::new();
        for package in iter {
            map.insert(package);
        }
        map
    }
}

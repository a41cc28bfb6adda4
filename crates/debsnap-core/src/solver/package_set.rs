use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::package::{Dependency, Package, PackageKey, ARCHITECTURE_ALL, ARCHITECTURE_SOURCE};

/// Lookup structures over the members of a [`PackageSet`]
#[derive(Debug, Clone, Default)]
struct PackageIndex {
    /// Packages by name, highest version first; equal versions keep insertion order
    by_name: HashMap<String, Vec<Arc<Package>>>,

    /// Packages indexed by the virtual names they provide
    providers: HashMap<String, Vec<Arc<Package>>>,
}

impl PackageIndex {
    fn build(packages: &IndexMap<PackageKey, Arc<Package>>) -> Self {
        let mut index = PackageIndex::default();

        for package in packages.values() {
            index
                .by_name
                .entry(package.name.clone())
                .or_default()
                .push(Arc::clone(package));
            index.insert_provides(package);
        }

        // stable sort: earlier insertions win ties
        for list in index.by_name.values_mut() {
            list.sort_by(|a, b| b.compare_version(a));
        }

        log::trace!("Built index over {} packages ({} names)", packages.len(), index.by_name.len());
        index
    }

    fn insert(&mut self, package: &Arc<Package>) {
        let list = self.by_name.entry(package.name.clone()).or_default();
        let position = list.partition_point(|existing| existing.compare_version(package).is_ge());
        list.insert(position, Arc::clone(package));
        self.insert_provides(package);
    }

    fn insert_provides(&mut self, package: &Arc<Package>) {
        for provided in package.provided_names() {
            self.providers
                .entry(provided)
                .or_default()
                .push(Arc::clone(package));
        }
    }

    fn remove(&mut self, package: &Package) {
        let key = package.key();

        if let Some(list) = self.by_name.get_mut(&package.name) {
            list.retain(|existing| existing.key() != key);
            if list.is_empty() {
                self.by_name.remove(&package.name);
            }
        }

        for provided in package.provided_names() {
            if let Some(list) = self.providers.get_mut(&provided) {
                list.retain(|existing| existing.key() != key);
                if list.is_empty() {
                    self.providers.remove(&provided);
                }
            }
        }
    }
}

/// Mutable, indexed collection of packages.
///
/// Members are unique by [`PackageKey`] and iterate in insertion order. The
/// index is built lazily on first search (or by [`prepare_index`]) and from
/// then on is updated by every `add`/`remove`, so searches always see the
/// current membership.
///
/// Not thread-safe; single-writer use only.
///
/// [`prepare_index`]: PackageSet::prepare_index
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    packages: IndexMap<PackageKey, Arc<Package>>,
    index: RefCell<Option<PackageIndex>>,
}

impl PackageSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from packages, keeping the first of any duplicates
    pub fn from_packages(packages: impl IntoIterator<Item = Arc<Package>>) -> Self {
        let mut set = Self::new();
        for package in packages {
            set.add(package);
        }
        set
    }

    /// Add a package. Returns false if a package with the same key was
    /// already a member.
    pub fn add(&mut self, package: Arc<Package>) -> bool {
        let key = package.key();
        if self.packages.contains_key(&key) {
            return false;
        }

        if let Some(index) = self.index.get_mut() {
            index.insert(&package);
        }
        self.packages.insert(key, package);
        true
    }

    /// Remove a package by identity. Returns false if it was not a member.
    pub fn remove(&mut self, package: &Package) -> bool {
        let Some(removed) = self.packages.shift_remove(&package.key()) else {
            return false;
        };

        if let Some(index) = self.index.get_mut() {
            index.remove(&removed);
        }
        true
    }

    /// Build the lookup index if it is not built yet
    pub fn prepare_index(&self) {
        self.with_index(|_| ());
    }

    /// Whether the lookup index has been built
    pub fn is_indexed(&self) -> bool {
        self.index.borrow().is_some()
    }

    fn with_index<R>(&self, f: impl FnOnce(&PackageIndex) -> R) -> R {
        let mut slot = self.index.borrow_mut();
        let index = slot.get_or_insert_with(|| PackageIndex::build(&self.packages));
        f(index)
    }

    /// Find packages satisfying `dependency`.
    ///
    /// Real packages come first, highest version first. Without a version
    /// constraint, providers of the name as a virtual package follow. With
    /// `all_matches == false` at most the single best match is returned.
    /// An empty result means nothing satisfies the expression.
    pub fn search(&self, dependency: &Dependency, all_matches: bool) -> Vec<Arc<Package>> {
        self.with_index(|index| {
            let mut results: Vec<Arc<Package>> = Vec::new();

            if let Some(candidates) = index.by_name.get(&dependency.name) {
                for package in candidates {
                    if package.matches_dependency(dependency) {
                        results.push(Arc::clone(package));
                        if !all_matches {
                            return results;
                        }
                    }
                }
            }

            if dependency.constraint.is_none() {
                if let Some(providers) = index.providers.get(&dependency.name) {
                    let candidates = providers.iter().filter(|package| {
                        dependency
                            .architecture
                            .as_deref()
                            .map_or(true, |architecture| package.matches_architecture(architecture))
                    });
                    for package in candidates {
                        if results.iter().any(|found| Arc::ptr_eq(found, package)) {
                            continue;
                        }
                        results.push(Arc::clone(package));
                        if !all_matches {
                            break;
                        }
                    }
                }
            }

            results
        })
    }

    /// Every member with exactly this name and architecture, any version
    pub fn search_exact(&self, name: &str, architecture: &str) -> Vec<Arc<Package>> {
        self.with_index(|index| {
            index
                .by_name
                .get(name)
                .map(|candidates| {
                    candidates
                        .iter()
                        .filter(|package| package.architecture == architecture)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    /// Distinct architectures of the members, sorted. `all` is never listed;
    /// `source` only when requested.
    pub fn architectures(&self, include_source: bool) -> Vec<String> {
        self.packages
            .values()
            .map(|package| package.architecture.as_str())
            .filter(|architecture| *architecture != ARCHITECTURE_ALL)
            .filter(|architecture| include_source || *architecture != ARCHITECTURE_SOURCE)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn contains(&self, package: &Package) -> bool {
        self.packages.contains_key(&package.key())
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Package>> {
        self.packages.values()
    }

    /// Keys of all members in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &PackageKey> {
        self.packages.keys()
    }
}

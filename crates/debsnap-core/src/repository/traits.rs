use std::sync::Arc;

use crate::error::Result;
use crate::package::{Package, PackageKey};
use crate::snapshot::Snapshot;
use crate::solver::PackageSet;

/// Named collection of snapshots
pub trait SnapshotRegistry {
    /// Look up a snapshot, failing with `NotFound` when it does not exist
    fn by_name(&self, name: &str) -> Result<Snapshot>;

    /// Check if a snapshot with this name exists
    fn contains(&self, name: &str) -> Result<bool>;

    /// Register a new snapshot
    fn add(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Names of all snapshots, sorted
    fn names(&self) -> Result<Vec<String>>;
}

/// Package data addressed by [`PackageKey`]
pub trait PackageRepository {
    /// Fetch packages in the order of `keys`, failing with `NotFound` for
    /// unknown keys
    fn resolve(&self, keys: &[PackageKey]) -> Result<Vec<Arc<Package>>>;

    /// Store packages, replacing any with the same key
    fn store(&mut self, packages: &[Package]) -> Result<()>;

    /// Number of stored packages
    fn count(&self) -> Result<usize>;
}

/// Materialize the packages referenced by `snapshot` into a set
pub fn load_package_set<P: PackageRepository + ?Sized>(repository: &P, snapshot: &Snapshot) -> Result<PackageSet> {
    let packages = repository.resolve(&snapshot.refs)?;
    log::debug!("Loaded {} packages of snapshot {}", packages.len(), snapshot.name);
    Ok(PackageSet::from_packages(packages))
}

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;

use super::traits::{PackageRepository, SnapshotRegistry};
use crate::error::{DebsnapError, Result};
use crate::package::{Package, PackageKey};
use crate::snapshot::Snapshot;

/// Snapshot registry held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    snapshots: BTreeMap<String, Snapshot>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl SnapshotRegistry for MemoryRegistry {
    fn by_name(&self, name: &str) -> Result<Snapshot> {
        self.snapshots
            .get(name)
            .cloned()
            .ok_or_else(|| DebsnapError::snapshot_not_found(name))
    }

    fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.snapshots.contains_key(name))
    }

    fn add(&mut self, snapshot: &Snapshot) -> Result<()> {
        if self.snapshots.contains_key(&snapshot.name) {
            return Err(DebsnapError::DuplicateName { name: snapshot.name.clone() });
        }
        self.snapshots.insert(snapshot.name.clone(), snapshot.clone());
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>> {
        Ok(self.snapshots.keys().cloned().collect())
    }
}

/// Package repository held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryPackageRepository {
    packages: IndexMap<PackageKey, Arc<Package>>,
}

impl MemoryPackageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PackageRepository for MemoryPackageRepository {
    fn resolve(&self, keys: &[PackageKey]) -> Result<Vec<Arc<Package>>> {
        keys.iter()
            .map(|key| {
                self.packages
                    .get(key)
                    .cloned()
                    .ok_or_else(|| DebsnapError::package_not_found(key.as_str()))
            })
            .collect()
    }

    fn store(&mut self, packages: &[Package]) -> Result<()> {
        for package in packages {
            self.packages.insert(package.key(), Arc::new(package.clone()));
        }
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.packages.len())
    }
}

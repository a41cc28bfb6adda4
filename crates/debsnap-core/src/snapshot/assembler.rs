use super::snapshot::{validate_name, Snapshot};
use crate::error::{DebsnapError, Result};
use crate::repository::SnapshotRegistry;
use crate::solver::PackageSet;

/// Description recorded on snapshots created by a pull
pub fn pull_description(destination: &str, source: &str, request: &[String]) -> String {
    format!(
        "Pulled into '{}' with '{}' as source, pull request was: '{}'",
        destination,
        source,
        request.join(" ")
    )
}

/// Creates snapshots and registers them.
///
/// The name is checked against the registry before anything is built; on
/// `DuplicateName` the package set is simply dropped by the caller.
pub struct SnapshotAssembler<'a, R: SnapshotRegistry + ?Sized> {
    registry: &'a mut R,
}

impl<'a, R: SnapshotRegistry + ?Sized> SnapshotAssembler<'a, R> {
    pub fn new(registry: &'a mut R) -> Self {
        Self { registry }
    }

    /// Freeze `set` as a new snapshot derived from `parents`
    pub fn assemble(
        &mut self,
        name: &str,
        parents: &[&Snapshot],
        set: &PackageSet,
        description: &str,
    ) -> Result<Snapshot> {
        self.check_name(name)?;

        let snapshot = Snapshot::from_package_set(name, parents, set, description);
        self.registry.add(&snapshot)?;

        log::info!("Created snapshot {} with {} packages", snapshot.name, snapshot.len());
        Ok(snapshot)
    }

    /// Freeze `set` as a new snapshot with no parents
    pub fn import(&mut self, name: &str, set: &PackageSet, description: &str) -> Result<Snapshot> {
        self.check_name(name)?;

        let snapshot = Snapshot::from_import(name, set, description);
        self.registry.add(&snapshot)?;

        log::info!("Imported snapshot {} with {} packages", snapshot.name, snapshot.len());
        Ok(snapshot)
    }

    fn check_name(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        if self.registry.contains(name)? {
            return Err(DebsnapError::DuplicateName { name: name.to_string() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::Package;
    use crate::repository::MemoryRegistry;
    use std::sync::Arc;

    #[test]
    fn test_pull_description() {
        let request = vec!["pkgA".to_string(), "pkgB (>= 1.0)".to_string()];
        assert_eq!(
            pull_description("wheezy", "backports", &request),
            "Pulled into 'wheezy' with 'backports' as source, pull request was: 'pkgA pkgB (>= 1.0)'"
        );
    }

    #[test]
    fn test_assemble_registers_snapshot() {
        let mut registry = MemoryRegistry::new();
        let set = PackageSet::from_packages([Arc::new(Package::new("a", "1", "amd64"))]);

        let dest = SnapshotAssembler::new(&mut registry).import("dest", &PackageSet::new(), "").unwrap();
        let source = SnapshotAssembler::new(&mut registry).import("source", &set, "").unwrap();

        let snapshot = SnapshotAssembler::new(&mut registry)
            .assemble("result", &[&dest, &source], &set, "pulled")
            .unwrap();

        assert_eq!(snapshot.source_ids, vec![dest.uuid.clone(), source.uuid.clone()]);
        assert_eq!(registry.by_name("result").unwrap(), snapshot);
        assert!(dest.refs.is_empty());
    }

    #[test]
    fn test_duplicate_name() {
        let mut registry = MemoryRegistry::new();
        let set = PackageSet::new();
        SnapshotAssembler::new(&mut registry).import("taken", &set, "").unwrap();

        let result = SnapshotAssembler::new(&mut registry).assemble("taken", &[], &set, "");
        assert!(matches!(result, Err(DebsnapError::DuplicateName { name }) if name == "taken"));
    }

    #[test]
    fn test_invalid_name() {
        let mut registry = MemoryRegistry::new();
        let result = SnapshotAssembler::new(&mut registry).import("../escape", &PackageSet::new(), "");
        assert!(matches!(result, Err(DebsnapError::InvalidName { .. })));
        assert!(registry.is_empty());
    }
}

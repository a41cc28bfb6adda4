use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::traits::{PackageRepository, SnapshotRegistry};
use crate::error::{DebsnapError, Result};
use crate::package::{Package, PackageKey};
use crate::snapshot::{validate_name, Snapshot};

const SNAPSHOTS_DIR: &str = "snapshots";
const PACKAGES_DIR: &str = "packages";
const PACKAGES_DB: &str = "db.json";

/// Snapshot registry and package repository stored as JSON under a root
/// directory:
///
/// ```text
/// <root>/snapshots/<name>.json
/// <root>/packages/db.json
/// ```
///
/// The package database is read once on open and rewritten on every
/// `store`. Files are replaced through a temporary file in the same
/// directory, so readers never see a half-written file.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    packages: IndexMap<PackageKey, Arc<Package>>,
}

impl FileStore {
    /// Open (creating if needed) the store at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(SNAPSHOTS_DIR))?;
        fs::create_dir_all(root.join(PACKAGES_DIR))?;

        let db_path = root.join(PACKAGES_DIR).join(PACKAGES_DB);
        let packages = if db_path.exists() {
            let stored: IndexMap<PackageKey, Package> = read_json(&db_path)?;
            stored.into_iter().map(|(key, package)| (key, Arc::new(package))).collect()
        } else {
            IndexMap::new()
        };

        log::debug!("Opened store at {} with {} packages", root.display(), packages.len());

        Ok(Self { root, packages })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.root.join(SNAPSHOTS_DIR).join(format!("{}.json", name))
    }

    fn db_path(&self) -> PathBuf {
        self.root.join(PACKAGES_DIR).join(PACKAGES_DB)
    }
}

impl SnapshotRegistry for FileStore {
    fn by_name(&self, name: &str) -> Result<Snapshot> {
        if validate_name(name).is_err() {
            return Err(DebsnapError::snapshot_not_found(name));
        }

        let path = self.snapshot_path(name);
        if !path.exists() {
            return Err(DebsnapError::snapshot_not_found(name));
        }
        read_json(&path)
    }

    fn contains(&self, name: &str) -> Result<bool> {
        Ok(validate_name(name).is_ok() && self.snapshot_path(name).exists())
    }

    fn add(&mut self, snapshot: &Snapshot) -> Result<()> {
        validate_name(&snapshot.name)?;

        let path = self.snapshot_path(&snapshot.name);
        if path.exists() {
            return Err(DebsnapError::DuplicateName { name: snapshot.name.clone() });
        }
        match create_json(&path, snapshot) {
            Err(DebsnapError::Io(err)) if err.kind() == io::ErrorKind::AlreadyExists => {
                Err(DebsnapError::DuplicateName { name: snapshot.name.clone() })
            }
            other => other,
        }
    }

    fn names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.root.join(SNAPSHOTS_DIR))? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl PackageRepository for FileStore {
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

        let stored: IndexMap<&PackageKey, &Package> =
            self.packages.iter().map(|(key, package)| (key, package.as_ref())).collect();
        write_json(&self.db_path(), &stored)?;

        log::debug!("Stored {} packages ({} total)", packages.len(), self.packages.len());
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.packages.len())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn temp_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<NamedTempFile> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let content = serde_json::to_string_pretty(value)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(file)
}

/// Replace `path` with the serialized value
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    temp_json(path, value)?.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Write the serialized value to `path`, failing with `AlreadyExists` if
/// another writer got there first
fn create_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    temp_json(path, value)?
        .persist_noclobber(path)
        .map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::PackageSet;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_layout() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("root")).unwrap();

        assert!(store.root().join("snapshots").is_dir());
        assert!(store.root().join("packages").is_dir());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_snapshot_persistence() {
        let dir = TempDir::new().unwrap();
        let snapshot = Snapshot::from_import("base", &PackageSet::new(), "first");

        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.add(&snapshot).unwrap();
            assert!(matches!(store.add(&snapshot), Err(DebsnapError::DuplicateName { .. })));
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.contains("base").unwrap());
        assert_eq!(store.by_name("base").unwrap(), snapshot);
        assert_eq!(store.names().unwrap(), vec!["base"]);
        assert!(dir.path().join("snapshots/base.json").is_file());
    }

    #[test]
    fn test_existing_snapshot_file_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let mut first = FileStore::open(dir.path()).unwrap();
        let second = FileStore::open(dir.path()).unwrap();

        let snapshot = Snapshot::from_import("base", &PackageSet::new(), "first");
        first.add(&snapshot).unwrap();
        let path = second.snapshot_path("base");
        let before = fs::read_to_string(&path).unwrap();

        let other = Snapshot::from_import("base", &PackageSet::new(), "second");
        match create_json(&path, &other) {
            Err(DebsnapError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::AlreadyExists),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), before);

        let mut second = second;
        assert!(matches!(second.add(&other), Err(DebsnapError::DuplicateName { .. })));
        assert_eq!(second.by_name("base").unwrap(), snapshot);
    }

    #[test]
    fn test_missing_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(!store.contains("nope").unwrap());
        assert!(!store.contains("../nope").unwrap());
        assert!(matches!(store.by_name("nope"), Err(DebsnapError::NotFound { .. })));
    }

    #[test]
    fn test_package_persistence() {
        let dir = TempDir::new().unwrap();
        let package = Package::new("bash", "5.2-1", "amd64").with_depends("libc6 (>= 2.36)");

        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.store(&[package.clone()]).unwrap();
            store.store(&[package.clone()]).unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        let resolved = store.resolve(&[package.key()]).unwrap();
        assert_eq!(*resolved[0], package);
    }
}

/// Integration tests for pulling between snapshots kept in a file store
///
/// These go through the same steps as the command line: import Packages
/// indexes, load both snapshots, pull, then assemble the result.

use debsnap_core::{
    load_package_set, parse_control, pull_description, resolve_architectures, CollectingSink, Dependency,
    DebsnapError, EventType, FileStore, PackageRepository, PackageSet, PullOptions, Puller, Snapshot,
    SnapshotAssembler, SnapshotRegistry, SourceKind,
};
use std::sync::Arc;
use tempfile::TempDir;

const STABLE: &str = "\
Package: nginx
Version: 1.22.1-9
Architecture: amd64
Depends: libc6 (>= 2.34), nginx-common (= 1.22.1-9)

Package: nginx-common
Version: 1.22.1-9
Architecture: all

Package: libc6
Version: 2.36-9
Architecture: amd64
";

const BACKPORTS: &str = "\
Package: nginx
Version: 1.26.0-1~bpo12+1
Architecture: amd64
Depends: libc6 (>= 2.34), nginx-common (= 1.26.0-1~bpo12+1),
 libssl3 (>= 3.0.0)

Package: nginx-common
Version: 1.26.0-1~bpo12+1
Architecture: all

Package: libssl3
Version: 3.0.13-1~deb12u1
Architecture: amd64
Depends: libc6 (>= 2.34)

Package: libc6
Version: 2.38-1
Architecture: amd64
";

fn import(store: &mut FileStore, name: &str, control: &str) -> Snapshot {
    let packages = parse_control(control).unwrap();
    store.store(&packages).unwrap();
    let set = PackageSet::from_packages(packages.into_iter().map(Arc::new));
    SnapshotAssembler::new(store).import(name, &set, "Imported").unwrap()
}

fn names(set: &PackageSet) -> Vec<String> {
    let mut names: Vec<String> = set.iter().map(|p| p.to_string()).collect();
    names.sort();
    names
}

#[test]
fn test_pull_between_snapshots() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    import(&mut store, "stable", STABLE);
    import(&mut store, "backports", BACKPORTS);

    let destination = store.by_name("stable").unwrap();
    let source = store.by_name("backports").unwrap();
    let mut dest_set = load_package_set(&store, &destination).unwrap();
    let source_set = load_package_set(&store, &source).unwrap();

    let architectures = resolve_architectures(&[], &dest_set).unwrap();
    assert_eq!(architectures, vec!["amd64"]);

    let request = vec!["nginx (>= 1.26)".to_string()];
    let initial: Vec<Dependency> = request.iter().map(|q| Dependency::parse(q).unwrap()).collect();

    let mut sink = CollectingSink::new();
    let report = Puller::new(PullOptions::new())
        .with_source_name(&source.name)
        .pull(&mut dest_set, &source_set, &initial, &architectures, &mut sink)
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(
        names(&dest_set),
        vec![
            "libc6_2.36-9_amd64",
            "libssl3_3.0.13-1~deb12u1_amd64",
            "nginx-common_1.26.0-1~bpo12+1_all",
            "nginx_1.26.0-1~bpo12+1_amd64",
        ]
    );
    assert_eq!(sink.count(EventType::Removed), 2);

    let description = pull_description(&destination.name, &source.name, &request);
    let snapshot = SnapshotAssembler::new(&mut store)
        .assemble("stable-nginx", &[&destination, &source], &dest_set, &description)
        .unwrap();

    let reopened = FileStore::open(dir.path()).unwrap();
    let stored = reopened.by_name("stable-nginx").unwrap();
    assert_eq!(stored, snapshot);
    assert_eq!(stored.source_kind, SourceKind::Snapshot);
    assert_eq!(stored.source_ids, vec![destination.uuid.clone(), source.uuid.clone()]);
    assert_eq!(
        stored.description,
        "Pulled into 'stable' with 'backports' as source, pull request was: 'nginx (>= 1.26)'"
    );
    assert_eq!(load_package_set(&reopened, &stored).unwrap().len(), 4);

    // parents are unchanged
    assert_eq!(reopened.by_name("stable").unwrap().refs.len(), 3);
}

#[test]
fn test_duplicate_destination_name() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    let stable = import(&mut store, "stable", STABLE);

    let set = load_package_set(&store, &stable).unwrap();
    let result = SnapshotAssembler::new(&mut store).assemble("stable", &[&stable], &set, "");

    assert!(matches!(result, Err(DebsnapError::DuplicateName { .. })));
    assert_eq!(store.names().unwrap(), vec!["stable"]);
}

#[test]
fn test_unknown_snapshot() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    match store.by_name("missing") {
        Err(err) => assert_eq!(err.to_string(), "Snapshot not found: missing"),
        Ok(_) => panic!("snapshot should not exist"),
    }
}

#[test]
fn test_no_architectures_in_empty_destination() {
    let dir = TempDir::new().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    let empty = import(&mut store, "empty", "");

    let set = load_package_set(&store, &empty).unwrap();
    assert!(matches!(resolve_architectures(&[], &set), Err(DebsnapError::NoArchitectures)));
}

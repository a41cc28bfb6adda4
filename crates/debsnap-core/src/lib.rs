pub mod config;
pub mod error;
pub mod event;
pub mod package;
pub mod repository;
pub mod snapshot;
pub mod solver;

pub use config::Config;
pub use error::{DebsnapError, Result};
pub use event::{CollectingSink, DiagnosticSink, EventType, LogSink, PullEvent};
pub use package::{parse_control, parse_control_file, parse_relations, Dependency, DependencyOptions, Package, PackageKey};
pub use repository::{load_package_set, FileStore, MemoryPackageRepository, MemoryRegistry, PackageRepository, SnapshotRegistry};
pub use snapshot::{pull_description, Snapshot, SnapshotAssembler, SourceKind};
pub use solver::{resolve_architectures, DependencyVerifier, PackageSet, PullOptions, PullReport, Puller, Verification};

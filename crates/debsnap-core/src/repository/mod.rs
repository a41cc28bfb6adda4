//! Storage collaborators: where snapshots and package data live.

mod file;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::{MemoryPackageRepository, MemoryRegistry};
pub use traits::{load_package_set, PackageRepository, SnapshotRegistry};

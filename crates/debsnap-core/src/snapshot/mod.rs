//! Immutable snapshots and their assembly from package sets.

mod assembler;
mod snapshot;

pub use assembler::{pull_description, SnapshotAssembler};
pub use snapshot::{validate_name, Snapshot, SourceKind};

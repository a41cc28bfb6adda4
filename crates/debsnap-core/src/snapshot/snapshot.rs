use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DebsnapError, Result};
use crate::package::PackageKey;
use crate::solver::PackageSet;

/// Where the packages of a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Derived from other snapshots (pull)
    Snapshot,
    /// Imported from a Packages index
    Import,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Snapshot => write!(f, "snapshot"),
            SourceKind::Import => write!(f, "import"),
        }
    }
}

/// A named, frozen list of package references.
///
/// Snapshots are never modified once created; pulling produces a new one
/// that records its parents in `source_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub uuid: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub source_kind: SourceKind,
    /// UUIDs of parent snapshots in order
    #[serde(default)]
    pub source_ids: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Package keys, sorted and unique
    #[serde(default)]
    pub refs: Vec<PackageKey>,
}

impl Snapshot {
    /// Freeze `set` into a snapshot derived from `parents`
    pub fn from_package_set(
        name: impl Into<String>,
        parents: &[&Snapshot],
        set: &PackageSet,
        description: impl Into<String>,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
            source_kind: SourceKind::Snapshot,
            source_ids: parents.iter().map(|parent| parent.uuid.clone()).collect(),
            description: description.into(),
            refs: sorted_refs(set),
        }
    }

    /// Freeze `set` into a snapshot without parents
    pub fn from_import(name: impl Into<String>, set: &PackageSet, description: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
            source_kind: SourceKind::Import,
            source_ids: Vec::new(),
            description: description.into(),
            refs: sorted_refs(set),
        }
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.name, self.description)
    }
}

fn sorted_refs(set: &PackageSet) -> Vec<PackageKey> {
    let mut refs: Vec<PackageKey> = set.keys().cloned().collect();
    refs.sort();
    refs.dedup();
    refs
}

/// Check that `name` can be used as a snapshot name.
///
/// Names end up as file names, so path separators, a leading dot and control
/// characters are refused.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name.trim() != name
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);

    if invalid {
        return Err(DebsnapError::InvalidName { name: name.to_string() });
    }
    Ok(())
}

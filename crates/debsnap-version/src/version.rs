//! Version parsing and dpkg ordering

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref UPSTREAM_CHARS: Regex = Regex::new(r"^[A-Za-z0-9.+~:\-]+$").unwrap();
    static ref REVISION_CHARS: Regex = Regex::new(r"^[A-Za-z0-9.+~]+$").unwrap();
}

/// Error type for version parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version string \"{0}\"")]
    InvalidVersion(String),
    #[error("Invalid epoch in version \"{0}\"")]
    InvalidEpoch(String),
    #[error("Invalid version string \"{version}\": {reason}")]
    InvalidVersionWithContext { version: String, reason: String },
}

/// A Debian package version: `[epoch:]upstream[-revision]`.
///
/// Ordering follows dpkg. Two versions that print differently may still be
/// equal (`1.0` and `1.00`, `2.1` and `0:2.1-0`).
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u32,
    upstream: String,
    revision: Option<String>,
    original: String,
}

impl Version {
    /// Parse a version string
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let original = text.trim();
        if original.is_empty() {
            return Err(VersionError::InvalidVersion(text.to_string()));
        }

        let (epoch, rest) = match original.split_once(':') {
            Some((epoch, rest)) => {
                if epoch.is_empty() || !epoch.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(VersionError::InvalidEpoch(original.to_string()));
                }
                let epoch = epoch
                    .parse::<u32>()
                    .map_err(|_| VersionError::InvalidEpoch(original.to_string()))?;
                (epoch, rest)
            }
            None => (0, original),
        };

        let (upstream, revision) = match rest.rsplit_once('-') {
            Some((upstream, revision)) => (upstream, Some(revision)),
            None => (rest, None),
        };

        if upstream.is_empty() {
            return Err(VersionError::InvalidVersionWithContext {
                version: original.to_string(),
                reason: "empty upstream version".to_string(),
            });
        }

        if !UPSTREAM_CHARS.is_match(upstream) {
            return Err(VersionError::InvalidVersionWithContext {
                version: original.to_string(),
                reason: "invalid character in upstream version".to_string(),
            });
        }

        if let Some(revision) = revision {
            if !REVISION_CHARS.is_match(revision) {
                return Err(VersionError::InvalidVersionWithContext {
                    version: original.to_string(),
                    reason: "invalid character in revision".to_string(),
                });
            }
        }

        Ok(Version {
            epoch,
            upstream: upstream.to_string(),
            revision: revision.map(str::to_string),
            original: original.to_string(),
        })
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// The version exactly as it was written
    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_fragment(&self.upstream, &other.upstream))
            .then_with(|| {
                compare_fragment(
                    self.revision.as_deref().unwrap_or(""),
                    other.revision.as_deref().unwrap_or(""),
                )
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    // Equal versions differ only in zero digits, so hashing without them
    // stays consistent with `Ord`.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epoch.hash(state);
        for b in self.upstream.bytes().filter(|&b| b != b'0') {
            b.hash(state);
        }
        0xffu8.hash(state);
        for b in self.revision.as_deref().unwrap_or("").bytes().filter(|&b| b != b'0') {
            b.hash(state);
        }
    }
}

/// Compare two version strings with dpkg ordering.
///
/// Strings that fail to parse are compared as a single fragment so that
/// malformed metadata still sorts deterministically.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => compare_fragment(a, b),
    }
}

/// Weight of a non-digit character: `~` sorts before everything, letters
/// before other symbols.
fn order(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(b'~') => -1,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => c as i32,
        Some(c) => c as i32 + 256,
    }
}

/// dpkg `verrevcmp` over one version component
fn compare_fragment(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.len() || j < b.len() {
        while (i < a.len() && !a[i].is_ascii_digit()) || (j < b.len() && !b[j].is_ascii_digit()) {
            let ac = order(a.get(i).copied());
            let bc = order(b.get(j).copied());
            if ac != bc {
                return ac.cmp(&bc);
            }
            i += 1;
            j += 1;
        }

        while i < a.len() && a[i] == b'0' {
            i += 1;
        }
        while j < b.len() && b[j] == b'0' {
            j += 1;
        }

        let mut first_diff = Ordering::Equal;
        while i < a.len() && a[i].is_ascii_digit() && j < b.len() && b[j].is_ascii_digit() {
            if first_diff == Ordering::Equal {
                first_diff = a[i].cmp(&b[j]);
            }
            i += 1;
            j += 1;
        }

        if i < a.len() && a[i].is_ascii_digit() {
            return Ordering::Greater;
        }
        if j < b.len() && b[j].is_ascii_digit() {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }

    Ordering::Equal
}

use std::cmp::Ordering;
use std::fmt;

use debsnap_version::compare_versions;
use serde::{Deserialize, Serialize};

use super::dependency::{Dependency, DependencyOptions};

/// Pseudo-architecture of architecture-independent packages
pub const ARCHITECTURE_ALL: &str = "all";

/// Pseudo-architecture of source packages
pub const ARCHITECTURE_SOURCE: &str = "source";

/// Stable identity of a package within a store: `P<arch> <name> <version>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageKey(String);

impl PackageKey {
    pub fn new(architecture: &str, name: &str, version: &str) -> Self {
        Self(format!("P{} {} {}", architecture, name, version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackageKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One concrete package build.
///
/// Relation fields are kept as the raw Debian text; they are only parsed when
/// dependencies get verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Package name
    pub name: String,

    /// Version as written in the index
    pub version: String,

    /// Architecture (`amd64`, `all`, `source`, ...)
    pub architecture: String,

    /// `Source` field: `name` or `name (version)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_depends: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommends: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggests: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<String>,
}

impl Package {
    /// Create a package without relations
    pub fn new(name: impl Into<String>, version: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            architecture: architecture.into(),
            source: None,
            depends: None,
            pre_depends: None,
            recommends: None,
            suggests: None,
            provides: None,
            conflicts: None,
        }
    }

    /// Set the `Depends` field
    pub fn with_depends(mut self, depends: impl Into<String>) -> Self {
        self.depends = Some(depends.into());
        self
    }

    /// Set the `Provides` field
    pub fn with_provides(mut self, provides: impl Into<String>) -> Self {
        self.provides = Some(provides.into());
        self
    }

    pub fn key(&self) -> PackageKey {
        PackageKey::new(&self.architecture, &self.name, &self.version)
    }

    /// Compare versions with dpkg ordering
    pub fn compare_version(&self, other: &Package) -> Ordering {
        compare_versions(&self.version, &other.version)
    }

    /// Whether this package can serve `architecture`.
    ///
    /// `all` packages serve every binary architecture but never `source`.
    pub fn matches_architecture(&self, architecture: &str) -> bool {
        if self.architecture == ARCHITECTURE_ALL && architecture != ARCHITECTURE_SOURCE {
            return true;
        }
        self.architecture == architecture
    }

    /// Whether this package satisfies `dependency` by name, version and
    /// architecture
    pub fn matches_dependency(&self, dependency: &Dependency) -> bool {
        if self.name != dependency.name {
            return false;
        }

        if let Some(architecture) = &dependency.architecture {
            if !self.matches_architecture(architecture) {
                return false;
            }
        }

        dependency.accepts_version(&self.version)
    }

    /// Relation fields that have to be satisfied for this package, as raw
    /// Debian text
    pub fn dependencies(&self, options: &DependencyOptions) -> Vec<String> {
        let mut fields: Vec<String> = [
            Some(&self.depends),
            Some(&self.pre_depends),
            options.follow_recommends.then_some(&self.recommends),
            options.follow_suggests.then_some(&self.suggests),
        ]
        .into_iter()
        .flatten()
        .filter_map(|field| field.clone())
        .filter(|field| !field.trim().is_empty())
        .collect();

        if options.follow_source {
            fields.push(self.source_dependency());
        }

        fields
    }

    /// `srcname (= srcversion) {source}` for this binary package
    pub fn source_dependency(&self) -> String {
        let (name, version) = match self.source.as_deref().map(str::trim) {
            Some(source) => match source.split_once('(') {
                Some((name, version)) => (name.trim(), version.trim_end_matches(')').trim()),
                None => (source, self.version.as_str()),
            },
            None => (self.name.as_str(), self.version.as_str()),
        };

        format!("{} (= {}) {{{}}}", name, version, ARCHITECTURE_SOURCE)
    }

    /// Names of virtual packages from the `Provides` field
    pub fn provided_names(&self) -> Vec<String> {
        self.provides
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter_map(|entry| {
                let name = entry.trim().split(|c: char| c.is_whitespace() || c == '(').next()?;
                (!name.is_empty()).then(|| name.to_string())
            })
            .collect()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.name, self.version, self.architecture)
    }
}

use std::fmt;
use std::str::FromStr;

use debsnap_version::{Operator, Version, VersionConstraint};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{DebsnapError, Result};

lazy_static! {
    static ref DEPENDENCY: Regex = Regex::new(
        r"^\s*([^\s(){}\[\]<>|,]+)\s*(?:\(\s*([<>=]+)\s*([^\s()]+)\s*\))?\s*(?:\{\s*([^\s{}]+)\s*\})?\s*$"
    )
    .unwrap();
    static ref RESTRICTIONS: Regex = Regex::new(r"\[[^\]]*\]|<[^<>()]*>\s*$").unwrap();
}

/// Which relations of a package are followed during verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DependencyOptions {
    /// Follow `Recommends`
    pub follow_recommends: bool,
    /// Follow `Suggests`
    pub follow_suggests: bool,
    /// Require the source package of every binary package
    pub follow_source: bool,
    /// Check and report every alternative of `a | b` groups
    pub follow_all_variants: bool,
}

/// A dependency expression: package name, optional relational version
/// constraint and target architecture.
///
/// Equality is structural; two expressions that print the same are the same
/// unit of work for the pull engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Target architecture, `None` meaning any
    pub architecture: Option<String>,
    /// Optional version constraint
    pub constraint: Option<VersionConstraint>,
}

impl Dependency {
    /// Expression matching any version of `name` on any architecture
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: None,
            constraint: None,
        }
    }

    /// Expression matching `name` on exactly one architecture
    pub fn with_name_and_architecture(name: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: Some(architecture.into()),
            constraint: None,
        }
    }

    /// Parse `name`, `name (op version)` and either with a `{arch}` suffix
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || DebsnapError::MalformedDependency { text: text.to_string() };

        let caps = DEPENDENCY.captures(text).ok_or_else(malformed)?;

        let name = caps[1].to_string();
        let name = match name.split_once(':') {
            Some((base, "any" | "native")) => base.to_string(),
            Some(_) => return Err(malformed()),
            None => name,
        };

        let constraint = match (caps.get(2), caps.get(3)) {
            (Some(op), Some(version)) => {
                let operator = op.as_str().parse::<Operator>().map_err(|_| malformed())?;
                let version = Version::parse(version.as_str()).map_err(|_| malformed())?;
                Some(VersionConstraint::new(operator, version))
            }
            _ => None,
        };

        Ok(Self {
            name,
            architecture: caps.get(4).map(|m| m.as_str().to_string()),
            constraint,
        })
    }

    /// Copy of this expression bound to `architecture`
    pub fn with_architecture(&self, architecture: impl Into<String>) -> Self {
        Self {
            architecture: Some(architecture.into()),
            ..self.clone()
        }
    }

    /// Copy bound to `architecture` unless an architecture is already set
    pub fn or_architecture(&self, architecture: &str) -> Self {
        match self.architecture {
            Some(_) => self.clone(),
            None => self.with_architecture(architecture),
        }
    }

    /// Whether a version string satisfies the constraint (if any)
    pub fn accepts_version(&self, version: &str) -> bool {
        self.constraint
            .as_ref()
            .map_or(true, |constraint| constraint.matches_str(version))
    }
}

impl FromStr for Dependency {
    type Err = DebsnapError;

    fn from_str(s: &str) -> Result<Self> {
        Dependency::parse(s)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " ({})", constraint)?;
        }
        if let Some(architecture) = &self.architecture {
            write!(f, " [{}]", architecture)?;
        }
        Ok(())
    }
}

/// Parse a Debian relation field (`Depends`, `Recommends`, ...) into groups
/// of alternatives: `a (>= 1), b | c` becomes `[[a], [b, c]]`.
///
/// Architecture restriction lists (`[amd64]`) and build profiles (`<!nocheck>`)
/// are dropped.
pub fn parse_relations(field: &str) -> Result<Vec<Vec<Dependency>>> {
    let mut groups = Vec::new();

    for group in field.split(',') {
        let group = group.trim();
        if group.is_empty() {
            continue;
        }

        let mut alternatives = Vec::new();
        for alternative in group.split('|') {
            let cleaned = RESTRICTIONS.replace_all(alternative, "");
            alternatives.push(Dependency::parse(&cleaned)?);
        }
        groups.push(alternatives);
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_only() {
        let dep = Dependency::parse("libc6").unwrap();
        assert_eq!(dep.name, "libc6");
        assert_eq!(dep.architecture, None);
        assert!(dep.constraint.is_none());
    }

    #[test]
    fn test_parse_with_constraint() {
        let dep = Dependency::parse("libc6 (>= 2.7)").unwrap();
        assert_eq!(dep.name, "libc6");
        let constraint = dep.constraint.unwrap();
        assert_eq!(constraint.operator(), Operator::GreaterOrEqual);
        assert_eq!(constraint.version().as_str(), "2.7");
    }

    #[test]
    fn test_parse_whitespace_tolerant() {
        let dep = Dependency::parse("  libc6(<<3.0)  ").unwrap();
        assert_eq!(dep.name, "libc6");
        assert_eq!(dep.constraint.unwrap().operator(), Operator::StrictlyLess);
    }

    #[test]
    fn test_parse_with_architecture() {
        let dep = Dependency::parse("libc6 (= 2.36-9) {i386}").unwrap();
        assert_eq!(dep.architecture.as_deref(), Some("i386"));

        let dep = Dependency::parse("xserver-xorg {amd64}").unwrap();
        assert_eq!(dep.architecture.as_deref(), Some("amd64"));
        assert!(dep.constraint.is_none());
    }

    #[test]
    fn test_parse_multiarch_qualifier() {
        let dep = Dependency::parse("python3:any (>= 3.11)").unwrap();
        assert_eq!(dep.name, "python3");
        assert!(Dependency::parse("python3:foo").is_err());
    }

    #[test]
    fn test_parse_malformed() {
        for text in ["", "   ", "a b", "libc6 (>= )", "libc6 (!= 1.0)", "libc6 (>= 1.0", "a, b", "a | b", "libc6 (>= 1 0)"] {
            let err = Dependency::parse(text).unwrap_err();
            assert!(matches!(err, DebsnapError::MalformedDependency { .. }), "{}", text);
        }
    }

    #[test]
    fn test_structural_equality() {
        let a = Dependency::parse("pkg (>= 1.0)").unwrap().with_architecture("amd64");
        let b = Dependency::parse("pkg (>= 1.0) {amd64}").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, b.with_architecture("i386"));
        assert_ne!(a, Dependency::parse("pkg (>> 1.0) {amd64}").unwrap());
    }

    #[test]
    fn test_or_architecture_keeps_explicit() {
        let dep = Dependency::parse("pkg {i386}").unwrap();
        assert_eq!(dep.or_architecture("amd64").architecture.as_deref(), Some("i386"));
        let dep = Dependency::parse("pkg").unwrap();
        assert_eq!(dep.or_architecture("amd64").architecture.as_deref(), Some("amd64"));
    }

    #[test]
    fn test_display() {
        let dep = Dependency::parse("pkg (>= 1.0)").unwrap().with_architecture("amd64");
        assert_eq!(dep.to_string(), "pkg (>= 1.0) [amd64]");
        assert_eq!(Dependency::new("pkg").to_string(), "pkg");
    }

    #[test]
    fn test_parse_relations() {
        let groups = parse_relations("libc6 (>= 2.7), libfoo1 | libbar1 (<< 2), ").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 1);
        assert_eq!(groups[1].len(), 2);
        assert_eq!(groups[1][1].name, "libbar1");
    }

    #[test]
    fn test_parse_relations_strips_restrictions() {
        let groups = parse_relations("libseccomp2 [amd64 i386], debhelper <!nocheck>").unwrap();
        assert_eq!(groups[0][0].name, "libseccomp2");
        assert_eq!(groups[0][0].architecture, None);
        assert_eq!(groups[1][0].name, "debhelper");
    }

    #[test]
    fn test_parse_relations_invalid() {
        assert!(parse_relations("libc6 (>= 2.7").is_err());
        assert!(parse_relations("").unwrap().is_empty());
    }
}

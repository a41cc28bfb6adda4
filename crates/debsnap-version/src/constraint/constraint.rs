//! Single relational version constraint

use std::fmt;

use super::Operator;
use crate::version::{compare_versions, Version};

/// A constraint such as `>= 1.2-1`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionConstraint {
    operator: Operator,
    version: Version,
}

impl VersionConstraint {
    pub fn new(operator: Operator, version: Version) -> Self {
        Self { operator, version }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Check whether a candidate version satisfies this constraint
    pub fn matches(&self, candidate: &Version) -> bool {
        self.operator.accepts(candidate.cmp(&self.version))
    }

    /// Like [`matches`](Self::matches) for raw version text
    pub fn matches_str(&self, candidate: &str) -> bool {
        self.operator
            .accepts(compare_versions(candidate, self.version.as_str()))
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.version)
    }
}

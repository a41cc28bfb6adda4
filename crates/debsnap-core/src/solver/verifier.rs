use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexSet;

use super::package_set::PackageSet;
use crate::error::DebsnapError;
use crate::package::{parse_relations, Dependency, DependencyOptions, ARCHITECTURE_ALL};

/// A package whose relation metadata could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationError {
    /// Package in `name_version_arch` form
    pub package: String,
    pub message: String,
}

impl fmt::Display for RelationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.package, self.message)
    }
}

impl From<RelationError> for DebsnapError {
    fn from(err: RelationError) -> Self {
        DebsnapError::InvalidRelation {
            package: err.package,
            message: err.message,
        }
    }
}

/// Outcome of a verification run
#[derive(Debug, Clone, Default)]
pub struct Verification {
    /// Unsatisfied expressions, deduplicated, in discovery order
    pub missing: Vec<Dependency>,
    /// Packages whose relations could not be processed
    pub errors: Vec<RelationError>,
}

impl Verification {
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty() && self.errors.is_empty()
    }
}

/// Checks the declared relations of packages against a package set.
#[derive(Debug, Clone, Default)]
pub struct DependencyVerifier {
    options: DependencyOptions,
}

impl DependencyVerifier {
    pub fn new(options: DependencyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DependencyOptions {
        &self.options
    }

    /// Find the relations of `candidate` packages that `context` does not satisfy.
    ///
    /// Each architecture is checked separately; only candidates built for it
    /// (or for `all`) take part. Alternatives without an architecture are
    /// bound to the architecture being checked. A group `a | b` is satisfied
    /// by either alternative unless `follow_all_variants` is set, in which
    /// case every unsatisfied alternative is reported. Expressions in `ignore`
    /// are never reported.
    ///
    /// Malformed relation fields are collected in [`Verification::errors`];
    /// the remaining fields and packages are still checked.
    pub fn verify(
        &self,
        candidate: &PackageSet,
        architectures: &[String],
        context: &PackageSet,
        ignore: Option<&HashSet<Dependency>>,
    ) -> Verification {
        let mut missing: IndexSet<Dependency> = IndexSet::new();
        let mut errors = Vec::new();
        let mut satisfied_cache: HashMap<Dependency, bool> = HashMap::new();

        for architecture in architectures {
            for package in candidate.iter() {
                if package.architecture != *architecture && package.architecture != ARCHITECTURE_ALL {
                    continue;
                }

                for field in package.dependencies(&self.options) {
                    let groups = match parse_relations(&field) {
                        Ok(groups) => groups,
                        Err(err) => {
                            log::warn!("Unable to process relations of {}: {}", package, err);
                            errors.push(RelationError {
                                package: package.to_string(),
                                message: err.to_string(),
                            });
                            continue;
                        }
                    };

                    for group in groups {
                        let mut group_missing: Vec<Dependency> = Vec::new();

                        for alternative in group {
                            let dependency = alternative.or_architecture(architecture);
                            let satisfied = *satisfied_cache
                                .entry(dependency.clone())
                                .or_insert_with(|| !context.search(&dependency, false).is_empty());

                            if satisfied {
                                if !self.options.follow_all_variants {
                                    group_missing.clear();
                                    break;
                                }
                            } else if !group_missing.contains(&dependency) {
                                group_missing.push(dependency);
                            }
                        }

                        for dependency in group_missing {
                            if ignore.map_or(false, |ignored| ignored.contains(&dependency)) {
                                continue;
                            }
                            missing.insert(dependency);
                        }
                    }
                }
            }
        }

        log::trace!("Verification found {} missing dependencies", missing.len());

        Verification {
            missing: missing.into_iter().collect(),
            errors,
        }
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexSet;

use super::package_set::PackageSet;
use super::verifier::{DependencyVerifier, RelationError};
use crate::error::{DebsnapError, Result};
use crate::event::{DiagnosticSink, PullEvent};
use crate::package::{Dependency, DependencyOptions, Package, ARCHITECTURE_ALL, ARCHITECTURE_SOURCE};

/// Flags controlling a pull
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Pull only the requested packages, not their dependencies
    pub no_deps: bool,
    /// Keep older versions of pulled packages in the destination
    pub no_remove: bool,
    /// Pull every matching version instead of the best one
    pub all_matches: bool,
    /// Which relation fields count as dependencies
    pub dependency_options: DependencyOptions,
    /// Upper bound on processed expressions per architecture
    pub max_iterations: Option<usize>,
}

impl PullOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_deps(mut self, value: bool) -> Self {
        self.no_deps = value;
        self
    }

    pub fn no_remove(mut self, value: bool) -> Self {
        self.no_remove = value;
        self
    }

    pub fn all_matches(mut self, value: bool) -> Self {
        self.all_matches = value;
        self
    }

    pub fn dependency_options(mut self, options: DependencyOptions) -> Self {
        self.dependency_options = options;
        self
    }

    pub fn max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit);
        self
    }
}

/// What a pull did, in the order it happened
#[derive(Debug, Clone, Default)]
pub struct PullReport {
    pub added: Vec<Arc<Package>>,
    pub removed: Vec<Arc<Package>>,
    pub unsatisfied: Vec<Dependency>,
    pub errors: Vec<RelationError>,
    /// Final work list length per architecture
    pub work_list_sizes: BTreeMap<String, usize>,
    /// Architectures that stopped at the iteration limit
    pub truncated: Vec<String>,
    /// Name of the source in diagnostics
    pub source: String,
    /// Bound on processed expressions per architecture, if any
    pub iteration_limit: Option<usize>,
}

impl PullReport {
    /// Whether every requested and discovered dependency was satisfied
    pub fn is_complete(&self) -> bool {
        self.unsatisfied.is_empty() && self.errors.is_empty() && self.truncated.is_empty()
    }

    /// Turn the first problem of the run into an error
    pub fn ensure_complete(&self) -> Result<()> {
        if let Some(dependency) = self.unsatisfied.first() {
            return Err(DebsnapError::Unsatisfiable {
                dependency: dependency.to_string(),
                source_name: self.source.clone(),
            });
        }
        if let Some(error) = self.errors.first() {
            return Err(error.clone().into());
        }
        if let Some(architecture) = self.truncated.first() {
            return Err(DebsnapError::IterationLimit {
                architecture: architecture.clone(),
                limit: self.iteration_limit.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

/// Pick the architectures a pull runs over.
///
/// The configured list wins when non-empty, otherwise the architectures
/// already present in the destination are used. The result is sorted and
/// deduplicated so diagnostics come out in a stable order.
pub fn resolve_architectures(configured: &[String], destination: &PackageSet) -> Result<Vec<String>> {
    let mut architectures: Vec<String> = if configured.is_empty() {
        destination.architectures(false)
    } else {
        configured
            .iter()
            .map(|architecture| architecture.trim().to_string())
            .filter(|architecture| !architecture.is_empty())
            .collect()
    };

    architectures.sort();
    architectures.dedup();

    if architectures.is_empty() {
        return Err(DebsnapError::NoArchitectures);
    }
    Ok(architectures)
}

/// Grows a destination package set with packages and their transitive
/// dependencies drawn from a source set.
#[derive(Debug, Clone)]
pub struct Puller {
    options: PullOptions,
    verifier: DependencyVerifier,
    source_name: String,
}

impl Puller {
    pub fn new(options: PullOptions) -> Self {
        let verifier = DependencyVerifier::new(options.dependency_options);
        Self {
            options,
            verifier,
            source_name: "source".to_string(),
        }
    }

    /// Name of the source used in diagnostics
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn options(&self) -> &PullOptions {
        &self.options
    }

    /// Pull `initial` from `source` into `destination` for each architecture.
    ///
    /// Architectures are processed in sorted order. For each one the initial
    /// expressions are bound to it and form a work list that grows with
    /// every unmet dependency of the packages added, until nothing new turns
    /// up. Unsatisfiable expressions and broken relations are reported to
    /// `sink` and skipped.
    ///
    /// Fails only when `architectures` is empty, before `destination` is
    /// touched.
    pub fn pull(
        &self,
        destination: &mut PackageSet,
        source: &PackageSet,
        initial: &[Dependency],
        architectures: &[String],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<PullReport> {
        if architectures.is_empty() {
            return Err(DebsnapError::NoArchitectures);
        }

        let mut architectures = architectures.to_vec();
        architectures.sort();
        architectures.dedup();

        let mut report = PullReport {
            source: self.source_name.clone(),
            iteration_limit: self.options.max_iterations,
            ..Default::default()
        };

        for architecture in &architectures {
            let size = self.pull_architecture(destination, source, initial, architecture, sink, &mut report);
            report.work_list_sizes.insert(architecture.clone(), size);
        }

        log::debug!(
            "Pull finished: {} added, {} removed, {} unsatisfied",
            report.added.len(),
            report.removed.len(),
            report.unsatisfied.len()
        );

        Ok(report)
    }

    fn pull_architecture(
        &self,
        destination: &mut PackageSet,
        source: &PackageSet,
        initial: &[Dependency],
        architecture: &str,
        sink: &mut dyn DiagnosticSink,
        report: &mut PullReport,
    ) -> usize {
        let mut work: IndexSet<Dependency> = initial
            .iter()
            .map(|dependency| dependency.with_architecture(architecture))
            .collect();

        log::debug!("Resolving {} expressions for {}", work.len(), architecture);

        let mut i = 0;
        while i < work.len() {
            if let Some(limit) = self.options.max_iterations {
                if i >= limit {
                    let event = PullEvent::IterationLimit {
                        architecture: architecture.to_string(),
                        limit,
                    };
                    sink.emit(&event);
                    report.truncated.push(architecture.to_string());
                    break;
                }
            }

            let dependency = work[i].clone();
            i += 1;

            let matches = source.search(&dependency, self.options.all_matches);
            if matches.is_empty() {
                sink.emit(&PullEvent::Unsatisfiable {
                    dependency: dependency.clone(),
                    source: self.source_name.clone(),
                });
                report.unsatisfied.push(dependency);
                continue;
            }

            if !self.options.no_remove {
                for package in &matches {
                    self.remove_versions(destination, package, architecture, sink, report);
                }
            }

            for package in &matches {
                destination.add(Arc::clone(package));
                sink.emit(&PullEvent::Added {
                    package: Arc::clone(package),
                    architecture: architecture.to_string(),
                });
                report.added.push(Arc::clone(package));
            }

            if self.options.no_deps {
                continue;
            }

            let target = [architecture.to_string()];
            for package in &matches {
                let candidate = PackageSet::from_packages([Arc::clone(package)]);
                let verification = self.verifier.verify(&candidate, &target, destination, None);

                for error in verification.errors {
                    sink.emit(&PullEvent::VerificationFailed {
                        package: error.package.clone(),
                        message: error.message.clone(),
                    });
                    report.errors.push(error);
                }

                for missing in verification.missing {
                    if work.insert(missing.clone()) {
                        log::trace!("{} requires {}", package, missing);
                    }
                }
            }
        }

        work.len()
    }

    /// Drop every version of `package`'s name that serves the same
    /// architecture from the destination.
    ///
    /// An `all` build and a binary build of the same name replace each
    /// other: pulling a binary build removes `all` members, and pulling an
    /// `all` build removes members of the architecture being processed.
    fn remove_versions(
        &self,
        destination: &mut PackageSet,
        package: &Package,
        architecture: &str,
        sink: &mut dyn DiagnosticSink,
        report: &mut PullReport,
    ) {
        let architectures = superseded_architectures(&package.architecture, architecture);

        let existing: Vec<Arc<Package>> = architectures
            .iter()
            .flat_map(|arch| destination.search_exact(&package.name, arch))
            .collect();

        for old in existing {
            if destination.remove(&old) {
                sink.emit(&PullEvent::Removed {
                    package: Arc::clone(&old),
                    architecture: architecture.to_string(),
                });
                report.removed.push(old);
            }
        }
    }
}

/// Architectures whose members a pulled build of `package_architecture`
/// replaces while processing `architecture`
fn superseded_architectures<'a>(package_architecture: &'a str, architecture: &'a str) -> Vec<&'a str> {
    let mut architectures = vec![package_architecture];
    match package_architecture {
        ARCHITECTURE_SOURCE => {}
        ARCHITECTURE_ALL => {
            if architecture != ARCHITECTURE_ALL && architecture != ARCHITECTURE_SOURCE {
                architectures.push(architecture);
            }
        }
        _ => architectures.push(ARCHITECTURE_ALL),
    }
    architectures
}

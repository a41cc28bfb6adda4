//! Dependency closure over package sets.
//!
//! A [`PackageSet`] is the indexed working collection, the
//! [`DependencyVerifier`] finds unmet relations of packages against a set, and
//! the [`Puller`] grows a destination set from a source set until no new
//! dependency shows up.

mod package_set;
mod pull;
mod verifier;


pub use package_set::PackageSet;
pub use pull::{resolve_architectures, PullOptions, PullReport, Puller};
pub use verifier::{DependencyVerifier, RelationError, Verification};

//! Debian package version library
//!
//! This crate provides version parsing, dpkg-compatible ordering and the
//! relational operators used in Debian dependency fields.

pub mod constraint;
mod version;

pub use constraint::{InvalidOperatorError, Operator, VersionConstraint};
pub use version::{compare_versions, Version, VersionError};

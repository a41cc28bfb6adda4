// Package model for Debian packages
//
// This module provides the package record, the dependency expressions used to
// query package sets, and the reader for Debian `Packages` indexes.

mod control;
mod dependency;
mod package;

pub use control::{parse_control, parse_control_file};
pub use dependency::{parse_relations, Dependency, DependencyOptions};
pub use package::{Package, PackageKey, ARCHITECTURE_ALL, ARCHITECTURE_SOURCE};

//! Relational constraints for version matching

mod constraint;
mod operator;

pub use constraint::VersionConstraint;
pub use operator::{InvalidOperatorError, Operator};

//! Operator types for version constraints

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Relational operators of Debian dependency fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Strictly earlier (<<)
    StrictlyLess,
    /// Earlier or equal (<=)
    LessOrEqual,
    /// Exactly equal (=)
    Equal,
    /// Later or equal (>=)
    GreaterOrEqual,
    /// Strictly later (>>)
    StrictlyGreater,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid operator: {0}")]
pub struct InvalidOperatorError(pub String);

impl Operator {
    /// Get the string representation of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::StrictlyLess => "<<",
            Operator::LessOrEqual => "<=",
            Operator::Equal => "=",
            Operator::GreaterOrEqual => ">=",
            Operator::StrictlyGreater => ">>",
        }
    }

    /// Whether `ordering` (candidate compared to the required version)
    /// satisfies this operator
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::StrictlyLess => ordering == Ordering::Less,
            Operator::LessOrEqual => ordering != Ordering::Greater,
            Operator::Equal => ordering == Ordering::Equal,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
            Operator::StrictlyGreater => ordering == Ordering::Greater,
        }
    }

    /// Get all supported operator spellings
    pub fn supported_operators() -> &'static [&'static str] {
        &["<<", "<=", "=", ">=", ">>", "<", ">"]
    }
}

impl FromStr for Operator {
    type Err = InvalidOperatorError;

    /// Parse an operator. The obsolete `<` and `>` forms mean `<=` and `>=`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<<" => Ok(Operator::StrictlyLess),
            "<=" | "<" => Ok(Operator::LessOrEqual),
            "=" => Ok(Operator::Equal),
            ">=" | ">" => Ok(Operator::GreaterOrEqual),
            ">>" => Ok(Operator::StrictlyGreater),
            _ => Err(InvalidOperatorError(s.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

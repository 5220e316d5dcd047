//! Core error types.

use std::fmt;

/// The recursive operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Clone,
    Mixin,
}

impl Operation {
    /// Returns the operation name as callers know it
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Clone => "clone",
            Operation::Mixin => "mixin",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised by clone and mixin.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("max {operation} depth of {limit} reached")]
    RecursionLimitExceeded { operation: Operation, limit: usize },
}

impl Error {
    /// The operation that failed
    pub fn operation(&self) -> Operation {
        match self {
            Error::RecursionLimitExceeded { operation, .. } => *operation,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

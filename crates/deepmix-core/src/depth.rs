//! Recursion depth guard.
//!
//! The depth of one call tree is carried as a plain value through every
//! recursive call, so independent call trees never share a counter.

use crate::error::{Error, Operation, Result};

/// Ceiling on nesting depth for a single clone or mixin call tree.
pub const MAX_DEPTH: usize = 100;

/// Current nesting level of one clone or mixin call tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    level: usize,
    operation: Operation,
}

impl Depth {
    /// Start a fresh chain for `operation` at level 0
    pub fn root(operation: Operation) -> Self {
        Self {
            level: 0,
            operation,
        }
    }

    /// Enter one more level of nesting.
    ///
    /// Fails once the new level reaches [`MAX_DEPTH`].
    pub fn descend(self) -> Result<Self> {
        let level = self.level + 1;
        if level >= MAX_DEPTH {
            log::debug!(
                "{} aborted at nesting level {} (limit {})",
                self.operation,
                level,
                MAX_DEPTH
            );
            return Err(Error::RecursionLimitExceeded {
                operation: self.operation,
                limit: MAX_DEPTH,
            });
        }
        Ok(Self { level, ..self })
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

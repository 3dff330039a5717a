//! Recoverable problems found while rendering. Rendering never fails on
//! missing data; it reports here and moves on.

use std::cell::RefCell;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Warning {
    #[error("partial `{name}` is not registered")]
    MissingPartial { name: String },
    #[error("partial `{name}` exceeds the nesting limit of {limit}")]
    PartialDepth { name: String, limit: usize },
    #[error("render invariant violated: {0}")]
    RenderInvariant(String),
}

impl Warning {
    /// Lookup warnings are the ones caused by names that did not resolve.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Warning::MissingPartial { .. } | Warning::PartialDepth { .. }
        )
    }
}

pub trait Logger {
    fn warn(&self, warning: Warning);
}

/// Forwards warnings to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn warn(&self, warning: Warning) {
        tracing::warn!(%warning, "render warning");
    }
}

/// Keeps warnings in memory.
#[derive(Debug, Default)]
pub struct CollectingLogger {
    warnings: RefCell<Vec<Warning>>,
}

impl CollectingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.borrow().clone()
    }

    pub fn take(&self) -> Vec<Warning> {
        self.warnings.take()
    }
}

impl Logger for CollectingLogger {
    fn warn(&self, warning: Warning) {
        self.warnings.borrow_mut().push(warning);
    }
}

//! Error conversion helpers for record source I/O
//!
//! Provides an extension trait for cleaner error handling with context.

use std::fmt::Display;
use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add the action and its target to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// source.load()
    ///     .with_context("load site records", &source.describe())?;
    /// ```
    fn with_context(self, action: &str, target: &dyn Display) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_context(self, action: &str, target: &dyn Display) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, target),
            source: Box::new(e),
        })
    }
}

//! Error types for page construction.

use thiserror::Error;

/// Errors raised while assembling a page.
///
/// Failures of the page fetcher are not represented here: they reach the
/// consumer as the fetcher's own error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamingError {
    /// A row's value count does not match the page's columns.
    #[error("row {row} has {actual} values, schema has {expected} columns")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

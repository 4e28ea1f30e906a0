//! Crate error type.

use thiserror::Error;

/// Errors reported by view construction and record-store edits.
///
/// Everything else degrades gracefully: out-of-range page requests are
/// clamped, missing fields never match, and mixed-type sort keys fall back
/// to a deterministic order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// `page_size` must be at least 1; zero would make every page bound
    /// undefined.
    #[error("page size must be positive, got {0}")]
    InvalidPageSize(usize),

    /// A record index outside the current collection.
    #[error("row {index} out of range [0, {len})")]
    RowOutOfRange { index: usize, len: usize },
}

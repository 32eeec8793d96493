//! Scheduler error types.

use std::path::PathBuf;

use thiserror::Error;

use chirp_store::StoreError;

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Errors surfaced synchronously at admission time.
///
/// Transcode failures are never returned from `enqueue`; they are only
/// observable through the status store.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Source file missing or not a regular file: {0}")]
    SourceMissing(PathBuf),

    #[error("Pending queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Status store error: {0}")]
    Store(#[from] StoreError),
}

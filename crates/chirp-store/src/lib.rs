//! Status store seam for transcode job records.
//!
//! The durable storage engine behind job status is an external collaborator;
//! the scheduler codes against the [`StatusStore`] trait. This crate ships
//! an in-memory implementation used by the worker binary and by tests.

pub mod error;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStatusStore;

use async_trait::async_trait;

use chirp_models::{EncodingState, JobId, VideoStatus};

/// Keyed record store for job lifecycle status.
///
/// Implementations must be safe to share across tasks; the scheduler holds
/// one behind an `Arc` and issues at most one write at a time per job.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Insert a new record.
    ///
    /// An existing record under the same id is overwritten, which is the
    /// documented outcome when two uploads derive the same id.
    async fn insert(&self, record: VideoStatus) -> StoreResult<()>;

    /// Transition an existing record to `state`, bumping its `updated_at`.
    ///
    /// `error_message` is persisted alongside the Failed state. Returns
    /// [`StoreError::NotFound`] if no record exists under `id`.
    async fn update(
        &self,
        id: &JobId,
        state: EncodingState,
        error_message: Option<String>,
    ) -> StoreResult<()>;

    /// Look up a record by id.
    async fn find(&self, id: &JobId) -> StoreResult<Option<VideoStatus>>;
}

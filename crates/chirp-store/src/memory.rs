//! In-memory status store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use chirp_models::{EncodingState, JobId, VideoStatus};

use crate::error::{StoreError, StoreResult};
use crate::StatusStore;

/// Status store backed by a process-local map.
///
/// Records live only as long as the process; the worker binary uses this
/// as its default store and tests use it as a drop-in for the durable one.
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    records: RwLock<HashMap<String, VideoStatus>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Count records currently in `state`.
    pub async fn count_in_state(&self, state: EncodingState) -> usize {
        self.records
            .read()
            .await
            .values()
            .filter(|r| r.state == state)
            .count()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn insert(&self, record: VideoStatus) -> StoreResult<()> {
        let mut records = self.records.write().await;
        // Colliding ids overwrite, matching the documented upload behavior.
        if let Some(previous) = records.insert(record.id.as_str().to_string(), record) {
            debug!(
                job_id = %previous.id,
                previous_state = %previous.state,
                "Overwrote existing status record"
            );
        }
        Ok(())
    }

    async fn update(
        &self,
        id: &JobId,
        state: EncodingState,
        error_message: Option<String>,
    ) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::not_found(id.as_str()))?;
        match error_message {
            Some(message) if state == EncodingState::Failed => record.fail(message),
            Some(message) => {
                record.set_state(state);
                record.error_message = Some(message);
            }
            None => record.set_state(state),
        }
        Ok(())
    }

    async fn find(&self, id: &JobId) -> StoreResult<Option<VideoStatus>> {
        let records = self.records.read().await;
        Ok(records.get(id.as_str()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStatusStore::new();
        let id = JobId::from_string("video1");
        store.insert(VideoStatus::new(id.clone())).await.unwrap();

        let found = store.find(&id).await.unwrap().unwrap();
        assert_eq!(found.state, EncodingState::Pending);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let store = MemoryStatusStore::new();
        let found = store.find(&JobId::from_string("nope")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_insert_overwrites_colliding_id() {
        let store = MemoryStatusStore::new();
        let id = JobId::from_string("video1");

        let mut first = VideoStatus::new(id.clone());
        first.set_state(EncodingState::Success);
        store.insert(first).await.unwrap();
        store.insert(VideoStatus::new(id.clone())).await.unwrap();

        let found = store.find(&id).await.unwrap().unwrap();
        assert_eq!(found.state, EncodingState::Pending);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_transitions_state() {
        let store = MemoryStatusStore::new();
        let id = JobId::from_string("video1");
        store.insert(VideoStatus::new(id.clone())).await.unwrap();

        store
            .update(&id, EncodingState::Processing, None)
            .await
            .unwrap();
        let found = store.find(&id).await.unwrap().unwrap();
        assert_eq!(found.state, EncodingState::Processing);

        store
            .update(&id, EncodingState::Failed, Some("boom".into()))
            .await
            .unwrap();
        let found = store.find(&id).await.unwrap().unwrap();
        assert_eq!(found.state, EncodingState::Failed);
        assert_eq!(found.error_message.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStatusStore::new();
        let err = store
            .update(&JobId::from_string("nope"), EncodingState::Processing, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}

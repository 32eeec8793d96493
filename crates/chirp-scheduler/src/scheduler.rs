//! Single-flight FIFO transcode scheduler.
//!
//! One drain task at a time walks the pending list head-first, persisting
//! each lifecycle transition to the status store. Enqueue admissions stay
//! short and never wait on the in-flight encode.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tracing::{error, info, warn};

use chirp_media::Transcoder;
use chirp_models::{EncodingState, JobId, VideoStatus};
use chirp_store::StatusStore;

use crate::config::SchedulerConfig;
use crate::error::{SchedulerError, SchedulerResult};

/// Video transcode scheduler.
///
/// Owns the pending list, the drain gate, and the store/transcoder
/// handles. Cheap to clone; all clones share the same queue.
#[derive(Clone)]
pub struct TranscodeScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    config: SchedulerConfig,
    store: Arc<dyn StatusStore>,
    transcoder: Arc<dyn Transcoder>,
    /// Source paths awaiting processing, strict arrival order. The head
    /// entry stays in place while its encode runs and is popped only once
    /// the job reaches a terminal state.
    pending: Mutex<VecDeque<PathBuf>>,
    /// Single permit; holding it is the exclusive right to drain.
    drain_gate: Arc<Semaphore>,
}

impl TranscodeScheduler {
    /// Create a scheduler over the given store and transcoder.
    pub fn new(
        config: SchedulerConfig,
        store: Arc<dyn StatusStore>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                store,
                transcoder,
                pending: Mutex::new(VecDeque::new()),
                drain_gate: Arc::new(Semaphore::new(1)),
            }),
        }
    }

    /// Admit a staged source file for transcoding.
    ///
    /// Inserts a Pending status record, appends the path to the pending
    /// list, and kicks the drain loop. Returns as soon as the job is
    /// admitted; the encode outcome is observable only via
    /// [`get_status`](Self::get_status).
    ///
    /// Admission errors (missing source, full queue, store insert failure)
    /// are returned synchronously and leave the job unqueued.
    pub async fn enqueue(&self, source: impl Into<PathBuf>) -> SchedulerResult<JobId> {
        let source = source.into();

        let is_file = tokio::fs::metadata(&source)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(SchedulerError::SourceMissing(source));
        }

        {
            let pending = self.inner.pending.lock().await;
            if pending.len() >= self.inner.config.capacity {
                return Err(SchedulerError::QueueFull {
                    capacity: self.inner.config.capacity,
                });
            }
        }

        // Persist before queueing so an insert failure rejects the job
        // outright instead of leaving an untracked list entry.
        let id = JobId::from_source_path(&source);
        self.inner.store.insert(VideoStatus::new(id.clone())).await?;

        {
            let mut pending = self.inner.pending.lock().await;
            pending.push_back(source.clone());
            info!(
                job_id = %id,
                source = %source.display(),
                queued = pending.len(),
                "Enqueued transcode job"
            );
        }

        self.trigger_drain();
        Ok(id)
    }

    /// Kick the drain loop if it is not already running.
    ///
    /// Idempotent: while a drain holds the gate permit this is a no-op,
    /// and calling it with an empty pending list does nothing.
    pub fn trigger_drain(&self) {
        self.inner.trigger();
    }

    /// Read-through status lookup; no effect on queue state.
    pub async fn get_status(&self, id: &JobId) -> SchedulerResult<Option<VideoStatus>> {
        Ok(self.inner.store.find(id).await?)
    }

    /// Number of entries in the pending list, including the in-flight head.
    pub async fn pending_len(&self) -> usize {
        self.inner.pending.lock().await.len()
    }

    /// True when no drain is running and nothing is queued.
    pub async fn is_idle(&self) -> bool {
        self.inner.drain_gate.available_permits() == 1
            && self.inner.pending.lock().await.is_empty()
    }

    /// Wait until the queue is fully drained.
    pub async fn wait_until_idle(&self) {
        loop {
            if self.is_idle().await {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
    }
}

impl Inner {
    fn trigger(self: &Arc<Self>) {
        if let Ok(permit) = Arc::clone(&self.drain_gate).try_acquire_owned() {
            let inner = Arc::clone(self);
            tokio::spawn(async move {
                inner.drain(permit).await;
            });
        }
    }

    /// Process pending jobs head-first until the list is empty.
    async fn drain(self: Arc<Self>, permit: OwnedSemaphorePermit) {
        loop {
            let head = self.pending.lock().await.front().cloned();
            let Some(source) = head else { break };

            self.process_one(&source).await;

            // Dequeue on both outcomes so a failing job can never wedge
            // the queue.
            self.pending.lock().await.pop_front();
        }

        drop(permit);

        // An enqueue may have appended between the empty check and the
        // permit release; re-trigger so that job is not stranded until
        // the next admission.
        if !self.pending.lock().await.is_empty() {
            self.trigger();
        }
    }

    /// Run one job through Processing to a terminal state.
    async fn process_one(&self, source: &Path) {
        let id = JobId::from_source_path(source);

        self.persist_state(&id, EncodingState::Processing, None).await;

        match self.transcoder.transcode(source).await {
            Ok(()) => {
                if let Err(e) = tokio::fs::remove_file(source).await {
                    warn!(
                        job_id = %id,
                        source = %source.display(),
                        error = %e,
                        "Failed to remove source file after encode"
                    );
                }
                self.persist_state(&id, EncodingState::Success, None).await;
                info!(job_id = %id, source = %source.display(), "Encode complete");
            }
            Err(e) => {
                error!(
                    job_id = %id,
                    source = %source.display(),
                    error = %e,
                    "Encode failed, source file retained"
                );
                self.persist_state(&id, EncodingState::Failed, Some(e.to_string()))
                    .await;
            }
        }
    }

    /// Best-effort status write. A store outage degrades observability
    /// but never stalls the queue.
    async fn persist_state(&self, id: &JobId, state: EncodingState, message: Option<String>) {
        if let Err(e) = self.store.update(id, state, message).await {
            warn!(
                job_id = %id,
                state = %state,
                error = %e,
                "Status write failed, continuing drain"
            );
        }
    }
}

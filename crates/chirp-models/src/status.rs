//! Persisted video status records for polling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::JobId;

/// Encoding lifecycle state.
///
/// Serialized exactly as the PascalCase variant names; these strings are
/// the wire contract for the polling endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EncodingState {
    /// Waiting in the pending list for the drain loop
    #[default]
    Pending,
    /// Currently being transcoded
    Processing,
    /// Transcode finished, source file removed
    Success,
    /// Transcode failed, source file retained for inspection
    Failed,
}

impl EncodingState {
    /// Get string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingState::Pending => "Pending",
            EncodingState::Processing => "Processing",
            EncodingState::Success => "Success",
            EncodingState::Failed => "Failed",
        }
    }

    /// Check if this is a terminal state (no more transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, EncodingState::Success | EncodingState::Failed)
    }
}

impl std::fmt::Display for EncodingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Durable status record for one transcode job.
///
/// Created at enqueue time and mutated at most twice more
/// (Pending -> Processing -> Success/Failed). Terminal records are never
/// deleted; they stay around for client polling and audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    /// Job identifier, the store key
    pub id: JobId,
    /// Current lifecycle state
    pub state: EncodingState,
    /// Failure detail, set on the Processing -> Failed transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// When the record was inserted
    pub created_at: DateTime<Utc>,
    /// When the state last changed
    pub updated_at: DateTime<Utc>,
}

impl VideoStatus {
    /// Create a new Pending record.
    pub fn new(id: JobId) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: EncodingState::Pending,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to a new state and bump `updated_at`.
    pub fn set_state(&mut self, state: EncodingState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    /// Mark the job as failed with an error message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = EncodingState::Failed;
        self.error_message = Some(message.into());
        self.updated_at = Utc::now();
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_pending() {
        let record = VideoStatus::new(JobId::from_string("video1"));
        assert_eq!(record.state, EncodingState::Pending);
        assert_eq!(record.created_at, record.updated_at);
        assert!(!record.is_terminal());
    }

    #[test]
    fn test_state_transitions_bump_updated_at() {
        let mut record = VideoStatus::new(JobId::from_string("video1"));
        let created = record.created_at;

        record.set_state(EncodingState::Processing);
        assert_eq!(record.state, EncodingState::Processing);
        assert!(record.updated_at >= created);

        record.set_state(EncodingState::Success);
        assert!(record.is_terminal());
    }

    #[test]
    fn test_fail_records_message() {
        let mut record = VideoStatus::new(JobId::from_string("video1"));
        record.fail("ffmpeg exited with code 1");
        assert_eq!(record.state, EncodingState::Failed);
        assert_eq!(record.error_message.as_deref(), Some("ffmpeg exited with code 1"));
        assert!(record.is_terminal());
    }

    #[test]
    fn test_wire_shape() {
        let record = VideoStatus::new(JobId::from_string("video1"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "video1");
        assert_eq!(json["state"], "Pending");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("errorMessage").is_none());
    }
}

//! Shared data models for the Chirp media pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Job identifiers derived from staged upload files
//! - Encoding lifecycle states
//! - Persisted video status records

pub mod job;
pub mod status;

// Re-export common types
pub use job::JobId;
pub use status::{EncodingState, VideoStatus};

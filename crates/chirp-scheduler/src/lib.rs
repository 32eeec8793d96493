//! Video transcode scheduler.
//!
//! This crate provides:
//! - Bounded FIFO admission of staged upload files
//! - A single-flight drain loop driving the external transcoder
//! - Durable status transitions for client polling
//! - Source file cleanup on success, retention on failure

pub mod config;
pub mod error;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use error::{SchedulerError, SchedulerResult};
pub use scheduler::TranscodeScheduler;

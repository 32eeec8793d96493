//! Transcoder seam and FFmpeg HLS encoding.
//!
//! The scheduler treats transcoding as an opaque, slow, fallible operation
//! behind the [`Transcoder`] trait. [`HlsTranscoder`] is the production
//! implementation, shelling out to ffmpeg.

pub mod error;
pub mod hls;

pub use error::{MediaError, MediaResult};
pub use hls::HlsTranscoder;

use std::path::Path;

use async_trait::async_trait;

/// An external transcode operation.
///
/// Takes substantial wall-clock time, either completes or fails, and
/// offers no cancellation or progress reporting. Output artifacts are the
/// implementation's concern; callers only learn success or failure.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, source: &Path) -> MediaResult<()>;
}

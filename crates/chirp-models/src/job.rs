//! Job identifiers.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Unique identifier for a transcode job.
///
/// Derived deterministically from the staged file's base name with the
/// extension stripped, so `/uploads/video1.mp4` becomes `video1`. Two
/// uploads that share a base name collide on the same status record; the
/// later insert overwrites the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Derive the job ID from a staged source file path.
    ///
    /// Only the final path component matters; everything after the first
    /// dot is treated as the extension, matching the upload handler's
    /// naming scheme (`abc123.mp4`, `abc123.0.mp4` both map to `abc123`).
    pub fn from_source_path(path: impl AsRef<Path>) -> Self {
        let name = path
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Dotfiles like ".gitkeep" have an empty stem; fall back to the
        // full name rather than minting an empty id.
        let stem = match name.split('.').next() {
            Some(s) if !s.is_empty() => s,
            _ => name.as_str(),
        };
        Self(stem.to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_source_path() {
        assert_eq!(JobId::from_source_path("/tmp/video1.mp4").as_str(), "video1");
        assert_eq!(JobId::from_source_path("clip.mov").as_str(), "clip");
    }

    #[test]
    fn test_id_strips_everything_after_first_dot() {
        assert_eq!(JobId::from_source_path("/up/abc123.0.mp4").as_str(), "abc123");
    }

    #[test]
    fn test_id_without_extension() {
        assert_eq!(JobId::from_source_path("/tmp/rawvideo").as_str(), "rawvideo");
    }

    #[test]
    fn test_dotfile_keeps_full_name_instead_of_empty_id() {
        assert_eq!(JobId::from_source_path("/spool/.gitkeep").as_str(), ".gitkeep");
        assert_eq!(JobId::from_source_path(".hidden").as_str(), ".hidden");
    }

    #[test]
    fn test_colliding_paths_share_an_id() {
        let a = JobId::from_source_path("/a/video1.mp4");
        let b = JobId::from_source_path("/b/video1.webm");
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_transparent() {
        let id = JobId::from_string("video1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"video1\"");
    }
}

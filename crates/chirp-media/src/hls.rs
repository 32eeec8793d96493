//! HLS transcoding via FFmpeg.
//!
//! Encodes a staged upload into a two-rendition adaptive-bitrate ladder
//! (720p and 1080p variant playlists plus a master playlist) under a
//! directory named after the job id, sibling to the source file.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use chirp_models::JobId;

use crate::error::{MediaError, MediaResult};
use crate::Transcoder;

/// Rendition ladder entry: (height, video bitrate).
const RENDITIONS: [(u32, &str); 2] = [(720, "2800k"), (1080, "5000k")];

/// FFmpeg-backed HLS transcoder.
#[derive(Debug, Clone)]
pub struct HlsTranscoder {
    ffmpeg: PathBuf,
    segment_seconds: u32,
}

impl HlsTranscoder {
    /// Create a transcoder, locating `ffmpeg` on the PATH.
    pub fn new() -> MediaResult<Self> {
        let ffmpeg = which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;
        Ok(Self::with_binary(ffmpeg))
    }

    /// Create a transcoder with an explicit ffmpeg binary path.
    pub fn with_binary(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            segment_seconds: 6,
        }
    }

    /// Override the HLS segment duration.
    pub fn segment_seconds(mut self, seconds: u32) -> Self {
        self.segment_seconds = seconds;
        self
    }

    /// Directory the rendition ladder is written to: a sibling of the
    /// source named after the job id.
    pub fn output_dir(source: &Path) -> PathBuf {
        let id = JobId::from_source_path(source);
        match source.parent() {
            Some(parent) => parent.join(id.as_str()),
            None => PathBuf::from(id.as_str()),
        }
    }

    /// Build the full ffmpeg argument list for one source file.
    pub fn build_args(&self, source: &Path, out_dir: &Path) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-v".into(),
            "error".into(),
            "-i".into(),
            source.display().to_string(),
        ];

        // Split the video stream once and scale each branch.
        let mut filter = format!("[0:v]split={}", RENDITIONS.len());
        for (i, _) in RENDITIONS.iter().enumerate() {
            filter.push_str(&format!("[s{i}]"));
        }
        for (i, (height, _)) in RENDITIONS.iter().enumerate() {
            filter.push_str(&format!(";[s{i}]scale=w=-2:h={height}[v{i}]"));
        }
        args.push("-filter_complex".into());
        args.push(filter);

        for (i, (_, bitrate)) in RENDITIONS.iter().enumerate() {
            args.extend([
                "-map".into(),
                format!("[v{i}]"),
                "-map".into(),
                "0:a:0".into(),
                format!("-c:v:{i}"),
                "libx264".into(),
                format!("-b:v:{i}"),
                (*bitrate).into(),
            ]);
        }

        args.extend([
            "-preset".into(),
            "veryfast".into(),
            "-c:a".into(),
            "aac".into(),
            "-b:a".into(),
            "128k".into(),
            "-f".into(),
            "hls".into(),
            "-hls_time".into(),
            self.segment_seconds.to_string(),
            "-hls_playlist_type".into(),
            "vod".into(),
            "-hls_segment_filename".into(),
            out_dir.join("v%v").join("seg%03d.ts").display().to_string(),
            "-master_pl_name".into(),
            "master.m3u8".into(),
            "-var_stream_map".into(),
            RENDITIONS
                .iter()
                .enumerate()
                .map(|(i, _)| format!("v:{i},a:{i}"))
                .collect::<Vec<_>>()
                .join(" "),
            out_dir.join("v%v").join("index.m3u8").display().to_string(),
        ]);

        args
    }
}

#[async_trait]
impl Transcoder for HlsTranscoder {
    async fn transcode(&self, source: &Path) -> MediaResult<()> {
        if !source.is_file() {
            return Err(MediaError::InvalidVideo(source.to_path_buf()));
        }

        let out_dir = Self::output_dir(source);
        for (i, _) in RENDITIONS.iter().enumerate() {
            tokio::fs::create_dir_all(out_dir.join(format!("v{i}"))).await?;
        }

        let args = self.build_args(source, &out_dir);
        debug!(args = ?args, "Running ffmpeg");

        let output = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(MediaError::ffmpeg_failed(
                format!("encoding {} failed", source.display()),
                Some(stderr),
                output.status.code(),
            ));
        }

        info!(
            source = %source.display(),
            out_dir = %out_dir.display(),
            "HLS encoding complete"
        );
        Ok(())
    }
}

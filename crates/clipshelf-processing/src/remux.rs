//! Fast-start remux via ffmpeg
//!
//! Rewrites an MP4 with `-movflags faststart` so the moov atom sits at the
//! front of the file and playback can begin before the full download. Streams
//! are copied, never re-encoded.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum RemuxError {
    #[error("Failed to spawn ffmpeg: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("ffmpeg exited with an error: {0}")]
    Failed(String),

    #[error("ffmpeg reported success but produced no output file")]
    MissingOutput,

    #[error("ffmpeg timed out after {0:?}")]
    TimedOut(Duration),
}

/// Capability to produce a fast-start copy of an input file. The returned
/// path is a sibling of the input; the caller owns its cleanup.
#[async_trait]
pub trait Remuxer: Send + Sync {
    async fn remux(&self, input: &Path) -> Result<PathBuf, RemuxError>;
}

/// Real remuxer shelling out to ffmpeg.
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
    timeout: Duration,
}

/// Output path for the fast-start copy: the input path with a
/// `.faststart.mp4` suffix appended.
pub fn faststart_output_path(input: &Path) -> PathBuf {
    let mut os: OsString = input.as_os_str().to_os_string();
    os.push(".faststart.mp4");
    PathBuf::from(os)
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    async fn remux(&self, input: &Path) -> Result<PathBuf, RemuxError> {
        let start = std::time::Instant::now();
        let output_path = faststart_output_path(input);

        // kill_on_drop so an elapsed timeout terminates ffmpeg; otherwise it
        // would keep writing to the output file after we remove it.
        let result = tokio::time::timeout(
            self.timeout,
            Command::new(&self.ffmpeg_path)
                .arg("-i")
                .arg(input)
                .arg("-c")
                .arg("copy")
                .arg("-movflags")
                .arg("faststart")
                .arg("-f")
                .arg("mp4")
                .arg("-y")
                .arg(&output_path)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let output = match result {
            Ok(io_result) => io_result?,
            Err(_) => {
                tracing::error!(
                    input = %input.display(),
                    timeout_secs = self.timeout.as_secs(),
                    "ffmpeg timed out"
                );
                let _ = tokio::fs::remove_file(&output_path).await;
                return Err(RemuxError::TimedOut(self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(input = %input.display(), stderr = %stderr, "ffmpeg failed");
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(RemuxError::Failed(stderr));
        }

        match tokio::fs::metadata(&output_path).await {
            Ok(meta) => {
                tracing::debug!(
                    input = %input.display(),
                    output = %output_path.display(),
                    size_bytes = meta.len(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Remuxed for fast start"
                );
                Ok(output_path)
            }
            Err(_) => Err(RemuxError::MissingOutput),
        }
    }
}

//! Container inspection via ffprobe
//!
//! Runs `ffprobe -v error -print_format json -show_streams` against a staged
//! file, picks the first video stream, and classifies its orientation. The
//! orientation becomes the storage key prefix for the uploaded object.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to spawn ffprobe: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("ffprobe exited with an error: {0}")]
    Failed(String),

    #[error("Failed to parse ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No video stream found in file")]
    NoVideoStream,

    #[error("ffprobe timed out after {0:?}")]
    TimedOut(Duration),
}

/// Orientation class derived from the first video stream's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Other,
}

impl Orientation {
    /// Storage key prefix for objects of this orientation.
    pub fn prefix(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Other => "other",
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Classify stream dimensions using exact integer arithmetic.
///
/// A stream is landscape when `width == 16 * height / 9` (integer division).
/// The portrait comparison mirrors the long-standing production check, which
/// compares `height` against `16 * height / 9` rather than the transposed
/// ratio; it is kept bit-for-bit so existing key prefixes stay stable, which
/// means portrait-shaped streams classify as `other`.
pub fn classify_orientation(width: i64, height: i64) -> Orientation {
    if width == 16 * height / 9 {
        Orientation::Landscape
    } else if height == 16 * height / 9 {
        Orientation::Portrait
    } else {
        Orientation::Other
    }
}

/// The subset of an ffprobe stream entry the pipeline cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoStreamInfo {
    #[serde(default)]
    pub codec_type: String,
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<VideoStreamInfo>,
}

/// Capability to inspect a media file's first video stream.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<VideoStreamInfo, ProbeError>;
}

/// Real prober shelling out to ffprobe.
pub struct FfprobeProber {
    ffprobe_path: String,
    timeout: Duration,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }

    fn select_video_stream(raw: &[u8]) -> Result<VideoStreamInfo, ProbeError> {
        let output: ProbeOutput = serde_json::from_slice(raw)?;
        output
            .streams
            .into_iter()
            .find(|s| s.codec_type == "video")
            .ok_or(ProbeError::NoVideoStream)
    }
}

#[async_trait]
impl MediaProbe for FfprobeProber {
    async fn probe(&self, path: &Path) -> Result<VideoStreamInfo, ProbeError> {
        let start = std::time::Instant::now();
        // kill_on_drop so an elapsed timeout terminates the tool instead of
        // leaving it running against the (possibly adversarial) input.
        let result = tokio::time::timeout(
            self.timeout,
            Command::new(&self.ffprobe_path)
                .arg("-v")
                .arg("error")
                .arg("-print_format")
                .arg("json")
                .arg("-show_streams")
                .arg(path)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let output = match result {
            Ok(io_result) => io_result?,
            Err(_) => {
                tracing::error!(
                    path = %path.display(),
                    timeout_secs = self.timeout.as_secs(),
                    "ffprobe timed out"
                );
                return Err(ProbeError::TimedOut(self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(path = %path.display(), stderr = %stderr, "ffprobe failed");
            return Err(ProbeError::Failed(stderr));
        }

        let stream = Self::select_video_stream(&output.stdout)?;
        tracing::debug!(
            path = %path.display(),
            width = stream.width,
            height = stream.height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Probed video stream"
        );
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_landscape() {
        assert_eq!(classify_orientation(1280, 720), Orientation::Landscape);
        assert_eq!(classify_orientation(1920, 1080), Orientation::Landscape);
    }

    #[test]
    fn portrait_dimensions_classify_as_other() {
        // The portrait arm compares height against 16*height/9 and so never
        // matches real portrait streams.
        assert_eq!(classify_orientation(720, 1280), Orientation::Other);
        assert_eq!(classify_orientation(1080, 1920), Orientation::Other);
    }

    #[test]
    fn classifies_other_ratios() {
        assert_eq!(classify_orientation(640, 480), Orientation::Other);
        assert_eq!(classify_orientation(1000, 1000), Orientation::Other);
    }

    #[test]
    fn zero_height_is_landscape_by_arithmetic() {
        // 0 == 16*0/9: degenerate metadata falls into the landscape arm.
        assert_eq!(classify_orientation(0, 0), Orientation::Landscape);
    }

    #[test]
    fn selects_first_video_stream() {
        let raw = br#"{
            "streams": [
                {"codec_type": "audio", "sample_rate": "44100"},
                {"codec_type": "video", "width": 1280, "height": 720},
                {"codec_type": "video", "width": 640, "height": 360}
            ]
        }"#;
        let stream = FfprobeProber::select_video_stream(raw).unwrap();
        assert_eq!(stream.width, 1280);
        assert_eq!(stream.height, 720);
    }

    #[test]
    fn no_video_stream_is_an_error() {
        let raw = br#"{"streams": [{"codec_type": "audio"}]}"#;
        assert!(matches!(
            FfprobeProber::select_video_stream(raw),
            Err(ProbeError::NoVideoStream)
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            FfprobeProber::select_video_stream(b"not json"),
            Err(ProbeError::Parse(_))
        ));
    }

    #[cfg(unix)]
    async fn process_gone(pid: u32) -> bool {
        // Treat a zombie as gone; the reap happens asynchronously.
        for _ in 0..50 {
            match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
                Err(_) => return true,
                Ok(stat) => {
                    let state = stat.rsplit_once(") ").and_then(|(_, rest)| rest.bytes().next());
                    if state == Some(b'Z') {
                        return true;
                    }
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timed_out_tool_is_killed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let pid_file = dir.path().join("pid");
        let tool = dir.path().join("slow-tool.sh");
        std::fs::write(
            &tool,
            format!("#!/bin/sh\necho $$ > {}\nexec sleep 30\n", pid_file.display()),
        )
        .unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let prober = FfprobeProber::new(
            tool.to_str().unwrap().to_string(),
            Duration::from_millis(200),
        );
        let err = prober
            .probe(std::path::Path::new("/dev/null"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::TimedOut(_)));

        let pid: u32 = std::fs::read_to_string(&pid_file)
            .expect("pid file")
            .trim()
            .parse()
            .expect("pid");
        assert!(process_gone(pid).await, "tool survived the timeout");
    }
}

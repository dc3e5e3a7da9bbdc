//! Bounded temp staging
//!
//! Buffers an inbound byte stream to an exclusively-owned temp file so the
//! downstream stages (probe, remux, upload) can operate on a seekable path.
//! The [`StagedFile`] owns the underlying `NamedTempFile`; dropping it on any
//! exit path removes the file.

use bytes::Bytes;
use futures::{pin_mut, Stream, StreamExt};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Upload exceeds limit of {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    #[error("Failed to read upload stream: {0}")]
    Stream(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully staged upload. The temp file lives as long as this value.
pub struct StagedFile {
    temp: NamedTempFile,
    size: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Copy `stream` into a new temp file, enforcing `limit` on the total size.
///
/// The byte count is checked as chunks arrive, so an oversized or unbounded
/// stream is cut off without finishing the transfer. Any error (including a
/// client disconnect surfacing as a stream error) drops the temp file.
pub async fn stage_stream<S, E>(stream: S, limit: u64) -> Result<StagedFile, StagingError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let start = std::time::Instant::now();
    let temp = tempfile::Builder::new().prefix("clipshelf-upload-").tempfile()?;
    let mut file = tokio::fs::File::create(temp.path()).await?;

    pin_mut!(stream);
    let mut size: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| StagingError::Stream(e.to_string()))?;
        size += chunk.len() as u64;
        if size > limit {
            return Err(StagingError::PayloadTooLarge { limit });
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    tracing::debug!(
        path = %temp.path().display(),
        size_bytes = size,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Upload staged"
    );

    Ok(StagedFile { temp, size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn chunks(parts: &[&[u8]]) -> impl Stream<Item = Result<Bytes, std::io::Error>> {
        let owned: Vec<Result<Bytes, std::io::Error>> = parts
            .iter()
            .map(|p| Ok(Bytes::copy_from_slice(p)))
            .collect();
        futures::stream::iter(owned)
    }

    #[tokio::test]
    async fn stages_all_chunks_in_order() {
        let staged = stage_stream(chunks(&[b"hello ", b"world"]), 1024)
            .await
            .expect("stage");
        assert_eq!(staged.size(), 11);
        let content = tokio::fs::read(staged.path()).await.unwrap();
        assert_eq!(content, b"hello world");
    }

    #[tokio::test]
    async fn oversized_stream_is_cut_off() {
        let result = stage_stream(chunks(&[b"aaaa", b"bbbb", b"cccc"]), 7).await;
        assert!(matches!(
            result,
            Err(StagingError::PayloadTooLarge { limit: 7 })
        ));
    }

    #[tokio::test]
    async fn stream_error_propagates() {
        let stream = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"ok")),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "client went away",
            )),
        ]);
        let result = stage_stream(stream, 1024).await;
        assert!(matches!(result, Err(StagingError::Stream(_))));
    }

    #[tokio::test]
    async fn temp_file_removed_on_drop() {
        let path: PathBuf = {
            let staged = stage_stream(chunks(&[b"data"]), 1024).await.unwrap();
            staged.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}

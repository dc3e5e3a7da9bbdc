//! Upload ingestion pipelines.
//!
//! The video pipeline runs validate -> stage -> probe -> remux -> store and
//! only reports success once the object is durably written. Every
//! intermediate file is cleaned up on all paths: the staged upload via
//! `StagedFile`'s RAII, the remux output via [`TempPathGuard`].

use crate::error::HttpAppError;
use bytes::Bytes;
use clipshelf_processing::{
    classify_orientation, stage_stream, validate_image_content_type, validate_video_content_type,
    MediaProbe, Remuxer,
};
use clipshelf_storage::keys::{generate_asset_filename, generate_object_key};
use clipshelf_storage::{LocalAssetStore, ObjectRef, ObjectStorage};
use futures::Stream;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Deletes a filesystem path when dropped. Used for the remux output, which
/// is a plain path rather than a managed temp file.
struct TempPathGuard {
    path: PathBuf,
}

impl TempPathGuard {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempPathGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove temp file");
            }
        }
    }
}

/// Result of a successful video ingestion.
#[derive(Debug)]
pub struct StoredVideo {
    /// Reference to the durably stored object.
    pub reference: ObjectRef,
    /// Size of the upload as received, before remuxing.
    pub size_bytes: u64,
}

/// The full video ingestion pipeline.
pub struct VideoIngest {
    prober: Arc<dyn MediaProbe>,
    remuxer: Arc<dyn Remuxer>,
    storage: Arc<dyn ObjectStorage>,
    max_bytes: u64,
}

impl VideoIngest {
    pub fn new(
        prober: Arc<dyn MediaProbe>,
        remuxer: Arc<dyn Remuxer>,
        storage: Arc<dyn ObjectStorage>,
        max_bytes: u64,
    ) -> Self {
        Self {
            prober,
            remuxer,
            storage,
            max_bytes,
        }
    }

    /// Run the pipeline on an incoming body. Nothing is persisted unless
    /// every stage succeeds; the returned reference names the stored object.
    pub async fn run<S, E>(
        &self,
        content_type: &str,
        body: S,
    ) -> Result<StoredVideo, HttpAppError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let extension = validate_video_content_type(content_type)?;

        let staged = stage_stream(body, self.max_bytes).await?;

        let stream_info = self.prober.probe(staged.path()).await?;
        let orientation = classify_orientation(stream_info.width, stream_info.height);

        let remuxed = TempPathGuard::new(self.remuxer.remux(staged.path()).await?);

        let key = generate_object_key(orientation.prefix(), &extension);
        self.storage
            .put_file(&key, "video/mp4", remuxed.path())
            .await?;

        let reference = ObjectRef::new(self.storage.bucket(), &key)?;
        tracing::info!(
            key = %key,
            orientation = %orientation,
            size_bytes = staged.size(),
            "Video ingested"
        );

        Ok(StoredVideo {
            reference,
            size_bytes: staged.size(),
        })
    }
}

/// Thumbnail ingestion: validate, stage, then copy into the local asset root.
pub struct ThumbnailIngest {
    assets: Arc<LocalAssetStore>,
    max_bytes: u64,
}

impl ThumbnailIngest {
    pub fn new(assets: Arc<LocalAssetStore>, max_bytes: u64) -> Self {
        Self { assets, max_bytes }
    }

    /// Returns the public URL of the stored thumbnail.
    pub async fn run<S, E>(&self, content_type: &str, body: S) -> Result<String, HttpAppError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let extension = validate_image_content_type(content_type)?;

        let staged = stage_stream(body, self.max_bytes).await?;

        let filename = generate_asset_filename(&extension);
        self.assets.save(&filename, staged.path()).await?;

        Ok(self.assets.url_for(&filename))
    }
}

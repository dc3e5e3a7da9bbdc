//! Local asset store for thumbnails.
//!
//! Thumbnails skip object storage entirely: they are written into a locally
//! served asset directory and addressed by a static URL.

use crate::traits::{StorageError, StorageResult};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem-backed store for locally served assets.
#[derive(Clone, Debug)]
pub struct LocalAssetStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalAssetStore {
    /// Create a new store rooted at `base_path`, served under `base_url`.
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create asset directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalAssetStore {
            base_path,
            base_url,
        })
    }

    /// Resolve a filename inside the asset root, rejecting traversal.
    fn filename_to_path(&self, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(StorageError::InvalidKey(format!(
                "Invalid asset filename: {}",
                filename
            )));
        }
        Ok(self.base_path.join(filename))
    }

    /// Copy a staged file into the asset root under `filename`.
    /// Returns the number of bytes written.
    pub async fn save(&self, filename: &str, source: &Path) -> StorageResult<u64> {
        let dest = self.filename_to_path(filename)?;
        let start = std::time::Instant::now();

        let size = fs::copy(source, &dest).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write asset {}: {}",
                dest.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %dest.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Asset write successful"
        );

        Ok(size)
    }

    /// Remove an asset. Missing files are not an error.
    pub async fn delete(&self, filename: &str) -> StorageResult<()> {
        let path = self.filename_to_path(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Public URL for an asset filename.
    pub fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), filename)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store(dir: &Path) -> LocalAssetStore {
        LocalAssetStore::new(dir, "http://localhost:8091/assets/".to_string())
            .await
            .expect("create store")
    }

    #[tokio::test]
    async fn save_writes_file_and_reports_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(dir.path()).await;

        let source = dir.path().join("source.png");
        tokio::fs::write(&source, b"png-bytes").await.unwrap();

        let size = store.save("thumb.png", &source).await.expect("save");
        assert_eq!(size, 9);
        let written = tokio::fs::read(dir.path().join("thumb.png")).await.unwrap();
        assert_eq!(written, b"png-bytes");
    }

    #[tokio::test]
    async fn traversal_filenames_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(dir.path()).await;
        let source = dir.path().join("source.png");
        tokio::fs::write(&source, b"x").await.unwrap();

        for bad in ["../escape.png", "a/b.png", "", "..\\win.png"] {
            let result = store.save(bad, &source).await;
            assert!(matches!(result, Err(StorageError::InvalidKey(_))), "{bad}");
        }
    }

    #[tokio::test]
    async fn url_for_joins_without_double_slash() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(dir.path()).await;
        assert_eq!(
            store.url_for("thumb.png"),
            "http://localhost:8091/assets/thumb.png"
        );
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(dir.path()).await;
        store.delete("missing.png").await.expect("no-op delete");
    }
}

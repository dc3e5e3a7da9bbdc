//! Storage abstraction trait
//!
//! This module defines the `ObjectStorage` trait implemented by durable
//! object storage backends. The upload pipeline and the signing service
//! depend only on this trait, so tests can use an in-memory store.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Malformed storage reference: {0}")]
    MalformedReference(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable object storage backend.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload a local file to `key`, tagged with `content_type`.
    async fn put_file(&self, key: &str, content_type: &str, path: &Path) -> StorageResult<()>;

    /// Mint a presigned GET URL for `key`, valid for `expires_in`.
    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Delete the object at `key`.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// The bucket this store writes to; recorded in stored references.
    fn bucket(&self) -> &str;
}

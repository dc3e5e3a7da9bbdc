//! Storage setup and initialization

use anyhow::{Context, Result};
use clipshelf_core::Config;
use clipshelf_storage::{LocalAssetStore, ObjectStorage, S3Storage};
use std::sync::Arc;

/// Construct the S3 object store and the local thumbnail asset store.
pub async fn setup_storage(
    config: &Config,
) -> Result<(Arc<dyn ObjectStorage>, Arc<LocalAssetStore>)> {
    let s3 = S3Storage::new(
        config.s3_bucket.clone(),
        config.s3_region.clone(),
        config.s3_endpoint.clone(),
    )
    .context("Failed to initialize S3 storage")?;
    tracing::info!(
        bucket = %config.s3_bucket,
        region = %config.s3_region,
        endpoint = ?config.s3_endpoint,
        "Object storage initialized"
    );

    let assets = LocalAssetStore::new(&config.assets_root, config.assets_base_url.clone())
        .await
        .context("Failed to initialize local asset store")?;
    tracing::info!(root = %config.assets_root.display(), "Asset store initialized");

    Ok((Arc::new(s3), Arc::new(assets)))
}

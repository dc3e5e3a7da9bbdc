//! Read-time URL signing.
//!
//! Records store packed `"{bucket},{key}"` references; clients only ever see
//! presigned URLs minted here. Thumbnail URLs are plain static asset URLs and
//! pass through untouched.

use crate::error::HttpAppError;
use clipshelf_core::models::{Video, VideoResponse};
use clipshelf_storage::{ObjectRef, ObjectStorage};
use std::time::Duration;

/// Presign a packed storage reference for reading.
pub async fn presign_reference(
    storage: &dyn ObjectStorage,
    reference: &str,
    expires_in: Duration,
) -> Result<String, HttpAppError> {
    let object_ref = ObjectRef::parse(reference)?;
    if object_ref.bucket != storage.bucket() {
        // Signing always goes through the configured store; a mismatched
        // bucket means the record predates a bucket move.
        tracing::warn!(
            reference_bucket = %object_ref.bucket,
            configured_bucket = %storage.bucket(),
            "Stored reference names a different bucket"
        );
    }
    let url = storage.signed_url(&object_ref.key, expires_in).await?;
    Ok(url)
}

/// Build the API response for a record, replacing the stored reference with a
/// freshly presigned URL.
pub async fn signed_response(
    storage: &dyn ObjectStorage,
    video: Video,
    expires_in: Duration,
) -> Result<VideoResponse, HttpAppError> {
    let mut response = VideoResponse::from(video);
    if let Some(reference) = response.video_url.take() {
        response.video_url = Some(presign_reference(storage, &reference, expires_in).await?);
    }
    Ok(response)
}

/// Sign a whole listing. Records whose reference cannot be signed are logged
/// and omitted rather than failing the listing.
pub async fn signed_responses(
    storage: &dyn ObjectStorage,
    videos: Vec<Video>,
    expires_in: Duration,
) -> Vec<VideoResponse> {
    let mut responses = Vec::with_capacity(videos.len());
    for video in videos {
        let id = video.id;
        match signed_response(storage, video, expires_in).await {
            Ok(response) => responses.push(response),
            Err(HttpAppError(e)) => {
                tracing::error!(video_id = %id, error = %e, "Skipping unsignable record in listing");
            }
        }
    }
    responses
}

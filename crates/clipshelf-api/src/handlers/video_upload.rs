//! Video media upload handler.
//!
//! Streams the multipart `video` field through the ingestion pipeline and,
//! only after the object is durably stored, swaps the record's reference.
//! A failed pipeline run leaves the record exactly as it was.

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{signing, VideoIngest};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use clipshelf_core::models::VideoResponse;
use clipshelf_core::AppError;
use clipshelf_storage::ObjectRef;
use std::sync::Arc;

const VIDEO_FIELD: &str = "video";

#[utoipa::path(
    post,
    path = "/api/videos/{id}/video",
    tag = "videos",
    params(("id" = Uuid, Path, description = "Video id")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded", body = VideoResponse),
        (status = 400, description = "Invalid media type or malformed body", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Processing or storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let id = crate::handlers::video_meta::parse_video_id(&id)?;

    // Take the per-video lock before reading the record: the snapshot of the
    // current reference must not go stale under a concurrent replace, or the
    // replaced object would never be deleted.
    let _guard = state.update_locks.acquire(id).await;

    let video = state
        .videos
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    if video.user_id != user.user_id {
        return Err(AppError::Unauthorized("Not the owner of this video".to_string()).into());
    }

    let previous_reference = video.video_url.clone();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .ok_or_else(|| {
                AppError::InvalidMediaType("Upload is missing a content type".to_string())
            })?
            .to_string();

        let ingest = VideoIngest::new(
            state.prober.clone(),
            state.remuxer.clone(),
            state.storage.clone(),
            state.config.max_video_upload_bytes,
        );
        let stored = ingest.run(&content_type, field).await?;

        let updated = state
            .videos
            .set_video_url(id, &stored.reference.encode())
            .await?;

        // The replaced object is unreachable once the reference is swapped.
        if let Some(old) = previous_reference {
            if old != stored.reference.encode() {
                if let Ok(object_ref) = ObjectRef::parse(&old) {
                    if let Err(e) = state.storage.delete(&object_ref.key).await {
                        tracing::warn!(video_id = %id, key = %object_ref.key, error = %e, "Failed to delete replaced object");
                    }
                }
            }
        }

        tracing::info!(
            video_id = %id,
            user_id = %user.user_id,
            size_bytes = stored.size_bytes,
            "Video upload complete"
        );

        let response = signing::signed_response(
            state.storage.as_ref(),
            updated,
            state.signed_url_expiry(),
        )
        .await?;
        return Ok(Json(response));
    }

    Err(AppError::InvalidInput(format!("Missing multipart field {:?}", VIDEO_FIELD)).into())
}

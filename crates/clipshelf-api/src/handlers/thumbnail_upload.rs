//! Thumbnail upload handler.
//!
//! Thumbnails go to the locally served asset directory, not object storage;
//! the record stores the public asset URL directly.

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{signing, ThumbnailIngest};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use clipshelf_core::models::VideoResponse;
use clipshelf_core::AppError;
use std::sync::Arc;

const THUMBNAIL_FIELD: &str = "thumbnail";

#[utoipa::path(
    post,
    path = "/api/videos/{id}/thumbnail",
    tag = "videos",
    params(("id" = Uuid, Path, description = "Video id")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail uploaded", body = VideoResponse),
        (status = 400, description = "Invalid media type or malformed body", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let id = crate::handlers::video_meta::parse_video_id(&id)?;

    // Lock before reading so the previous-URL snapshot cannot go stale under
    // a concurrent replace.
    let _guard = state.update_locks.acquire(id).await;

    let video = state
        .videos
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    if video.user_id != user.user_id {
        return Err(AppError::Unauthorized("Not the owner of this video".to_string()).into());
    }

    let previous_url = video.thumbnail_url.clone();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .ok_or_else(|| {
                AppError::InvalidMediaType("Upload is missing a content type".to_string())
            })?
            .to_string();

        let ingest = ThumbnailIngest::new(
            state.assets.clone(),
            state.config.max_thumbnail_upload_bytes,
        );
        let url = ingest.run(&content_type, field).await?;

        let updated = state.videos.set_thumbnail_url(id, &url).await?;

        if let Some(old) = previous_url {
            if old != url {
                if let Some(filename) = old.rsplit('/').next() {
                    if let Err(e) = state.assets.delete(filename).await {
                        tracing::warn!(video_id = %id, filename = %filename, error = %e, "Failed to delete replaced thumbnail");
                    }
                }
            }
        }

        tracing::info!(video_id = %id, user_id = %user.user_id, "Thumbnail upload complete");

        let response = signing::signed_response(
            state.storage.as_ref(),
            updated,
            state.signed_url_expiry(),
        )
        .await?;
        return Ok(Json(response));
    }

    Err(AppError::InvalidInput(format!("Missing multipart field {:?}", THUMBNAIL_FIELD)).into())
}

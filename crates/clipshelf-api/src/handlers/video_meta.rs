//! Video metadata handlers: create, get, list, delete.
//!
//! `get_video` is public; everything else requires a bearer token. Responses
//! always carry presigned URLs, never stored references.

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::signing;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use clipshelf_core::models::{CreateVideoParams, VideoResponse};
use clipshelf_core::AppError;
use clipshelf_storage::ObjectRef;
use std::sync::Arc;
use uuid::Uuid;

/// Parse a path id, rejecting non-UUID values with a 400 rather than axum's
/// plain-text path rejection.
pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid, HttpAppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()).into())
}

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoParams,
    responses(
        (status = 201, description = "Video record created", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(params): ValidatedJson<CreateVideoParams>,
) -> Result<(StatusCode, Json<VideoResponse>), HttpAppError> {
    if params.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Title must not be empty".to_string()).into());
    }

    let video = state.videos.create(user.user_id, params).await?;
    Ok((StatusCode::CREATED, Json(VideoResponse::from(video))))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    tag = "videos",
    params(("id" = Uuid, Path, description = "Video id")),
    responses(
        (status = 200, description = "Video with presigned URL", body = VideoResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    )
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let id = parse_video_id(&id)?;
    let video = state
        .videos
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    let response =
        signing::signed_response(state.storage.as_ref(), video, state.signed_url_expiry()).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Caller's videos, newest first", body = [VideoResponse]),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.videos.list_by_owner(user.user_id).await?;
    let responses =
        signing::signed_responses(state.storage.as_ref(), videos, state.signed_url_expiry()).await;
    Ok(Json(responses))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    tag = "videos",
    params(("id" = Uuid, Path, description = "Video id")),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    let id = parse_video_id(&id)?;

    // Lock before reading so the references being cleaned up cannot go stale
    // under a concurrent upload.
    let _guard = state.update_locks.acquire(id).await;

    let video = state
        .videos
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    if video.user_id != user.user_id {
        return Err(AppError::Unauthorized("Not the owner of this video".to_string()).into());
    }

    // Best-effort cleanup of stored media; the record delete proceeds even if
    // cleanup fails so the API never reports a ghost record.
    if let Some(reference) = &video.video_url {
        match ObjectRef::parse(reference) {
            Ok(object_ref) => {
                if let Err(e) = state.storage.delete(&object_ref.key).await {
                    tracing::warn!(video_id = %id, key = %object_ref.key, error = %e, "Failed to delete stored object");
                }
            }
            Err(e) => {
                tracing::warn!(video_id = %id, error = %e, "Stored reference unparseable during delete");
            }
        }
    }
    if let Some(url) = &video.thumbnail_url {
        if let Some(filename) = url.rsplit('/').next() {
            if let Err(e) = state.assets.delete(filename).await {
                tracing::warn!(video_id = %id, filename = %filename, error = %e, "Failed to delete thumbnail asset");
            }
        }
    }

    state.videos.delete(id).await?;
    tracing::info!(video_id = %id, user_id = %user.user_id, "Video deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_ids() {
        let err = parse_video_id("not-a-uuid").unwrap_err();
        assert_eq!(err.0.error_code(), "INVALID_ID");

        let id = Uuid::new_v4();
        assert_eq!(parse_video_id(&id.to_string()).unwrap(), id);
    }
}

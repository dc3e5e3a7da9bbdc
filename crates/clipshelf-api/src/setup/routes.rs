//! Route configuration and setup.

use crate::api_doc::ApiDoc;
use crate::handlers::{thumbnail_upload, video_meta, video_upload};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Assemble the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let assets_root = state.config.assets_root.clone();
    // Allow multipart framing overhead on top of the media limit; the
    // pipeline enforces the exact per-file limit during staging.
    let body_limit = (state.config.max_video_upload_bytes as usize).saturating_add(1 << 20);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route(
            "/api/videos",
            post(video_meta::create_video).get(video_meta::list_videos),
        )
        .route(
            "/api/videos/{id}",
            get(video_meta::get_video).delete(video_meta::delete_video),
        )
        .route("/api/videos/{id}/video", post(video_upload::upload_video))
        .route(
            "/api/videos/{id}/thumbnail",
            post(thumbnail_upload::upload_thumbnail),
        )
        .route("/api/openapi.json", get(openapi_spec))
        .route("/healthz", get(healthz))
        .with_state(state);

    api.nest_service("/assets", ServeDir::new(assets_root))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

//! OpenAPI documentation.

use crate::error;
use crate::handlers;
use clipshelf_core::models;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clipshelf API",
        version = "0.1.0",
        description = "Video upload and management API. Uploaded videos are \
            inspected, remuxed for fast-start playback, and stored in object \
            storage; reads return short-lived presigned URLs. Thumbnails are \
            served as static assets under /assets/."
    ),
    paths(
        handlers::video_meta::create_video,
        handlers::video_meta::get_video,
        handlers::video_meta::list_videos,
        handlers::video_meta::delete_video,
        handlers::video_upload::upload_video,
        handlers::thumbnail_upload::upload_thumbnail,
    ),
    components(schemas(
        models::CreateVideoParams,
        models::VideoResponse,
        error::ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "videos", description = "Video records and media uploads")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

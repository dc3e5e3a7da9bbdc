//! Video record model.
//!
//! The persisted `video_url` is a packed `"{bucket},{key}"` reference, not a
//! retrievable URL; responses carry a freshly presigned URL instead. Parsing
//! of the packed form is centralized in `clipshelf-storage::reference`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A video record as persisted.
///
/// `video_url` and `thumbnail_url` are set only after the corresponding
/// pipeline run fully succeeds; a freshly created record has neither.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Request body for creating video metadata. The owner is always taken from
/// the authenticated user, never from the body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateVideoParams {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// API representation of a video. `video_url`, when present, is a presigned
/// time-limited URL minted at read time.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        VideoResponse {
            id: video.id,
            created_at: video.created_at,
            updated_at: video.updated_at,
            title: video.title,
            description: video.description,
            user_id: video.user_id,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_params_description_is_optional() {
        let params: CreateVideoParams =
            serde_json::from_str(r#"{"title": "My ride"}"#).expect("deserialize");
        assert_eq!(params.title, "My ride");
        assert!(params.description.is_none());
    }

    #[test]
    fn response_preserves_record_fields() {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: "Trail run".into(),
            description: Some("morning loop".into()),
            user_id: Uuid::new_v4(),
            video_url: Some("bucket,landscape/abc.mp4".into()),
            thumbnail_url: None,
        };
        let response = VideoResponse::from(video.clone());
        assert_eq!(response.id, video.id);
        assert_eq!(response.video_url, video.video_url);
        assert!(response.thumbnail_url.is_none());
    }
}

//! Video repository
//!
//! CRUD operations for video records. URL mutations are split into dedicated
//! setters so the upload handlers touch exactly one column after a confirmed
//! pipeline success and nothing on failure.

use async_trait::async_trait;
use clipshelf_core::models::{CreateVideoParams, Video};
use clipshelf_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Metadata store collaborator for video records.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Create a record owned by `user_id`. The record starts with no
    /// video or thumbnail reference.
    async fn create(&self, user_id: Uuid, params: CreateVideoParams) -> Result<Video, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// All records owned by `user_id`, newest first.
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;

    /// Persist the packed storage reference after a confirmed upload.
    async fn set_video_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError>;

    /// Persist the thumbnail asset URL after a confirmed file write.
    async fn set_thumbnail_url(&self, id: Uuid, url: &str) -> Result<Video, AppError>;

    /// Delete a record. Returns false when the id does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Postgres implementation of [`VideoRepository`].
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn create(&self, user_id: Uuid, params: CreateVideoParams) -> Result<Video, AppError> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (title, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&params.title)
        .bind(&params.description)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(video_id = %video.id, user_id = %user_id, "Video record created");
        Ok(video)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(video)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let videos = sqlx::query_as::<_, Video>(
            "SELECT * FROM videos WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(videos)
    }

    async fn set_video_url(&self, id: Uuid, reference: &str) -> Result<Video, AppError> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET video_url = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        Ok(video)
    }

    async fn set_thumbnail_url(&self, id: Uuid, url: &str) -> Result<Video, AppError> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET thumbnail_url = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        Ok(video)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

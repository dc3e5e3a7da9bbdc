//! Database access layer for clipshelf.
//!
//! The `VideoRepository` trait is the seam between the API and the metadata
//! store: handlers and the upload pipeline only ever see the trait, so tests
//! can substitute an in-memory implementation. `PgVideoRepository` is the
//! Postgres implementation used in production.

mod video_repository;

pub use video_repository::{PgVideoRepository, VideoRepository};

use sqlx::PgPool;

/// Apply pending migrations. Run at startup, before serving traffic.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

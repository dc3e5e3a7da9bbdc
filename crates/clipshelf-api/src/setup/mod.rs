//! Application setup and initialization
//!
//! All startup wiring lives here rather than in main.rs: configuration
//! validation, database and storage construction, route assembly.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::{AppState, UpdateLocks};
use anyhow::{Context, Result};
use clipshelf_core::Config;
use clipshelf_db::PgVideoRepository;
use clipshelf_processing::{FfmpegRemuxer, FfprobeProber};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins; defaults to info.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Initialize the entire application.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration before touching the network.
    config.validate().context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated");

    let pool = database::setup_database(&config).await?;
    let (object_storage, assets) = storage::setup_storage(&config).await?;

    let tool_timeout = Duration::from_secs(config.tool_timeout_secs);
    let state = Arc::new(AppState {
        videos: Arc::new(PgVideoRepository::new(pool)),
        storage: object_storage,
        assets,
        prober: Arc::new(FfprobeProber::new(config.ffprobe_path.clone(), tool_timeout)),
        remuxer: Arc::new(FfmpegRemuxer::new(config.ffmpeg_path.clone(), tool_timeout)),
        update_locks: UpdateLocks::new(),
        config,
    });

    let router = routes::build_router(state.clone());
    Ok((state, router))
}

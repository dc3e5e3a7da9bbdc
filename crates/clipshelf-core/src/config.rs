//! Configuration module
//!
//! Environment-driven configuration for the API and the ingestion pipeline.
//! The loaded `Config` is threaded explicitly through application state;
//! nothing reads the environment after startup.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

// Defaults
const DEFAULT_PORT: u16 = 8091;
const DEFAULT_MAX_VIDEO_UPLOAD_BYTES: u64 = 1 << 30; // 1 GiB
const DEFAULT_MAX_THUMBNAIL_UPLOAD_BYTES: u64 = 10 << 20; // 10 MiB
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SIGNED_URL_EXPIRY_SECS: u64 = 3600;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Auth
    pub jwt_secret: String,
    // Object storage
    pub s3_bucket: String,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, Spaces, ...)
    pub s3_endpoint: Option<String>,
    // Local thumbnail assets
    pub assets_root: PathBuf,
    pub assets_base_url: String,
    // External tools
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub tool_timeout_secs: u64,
    // Upload limits
    pub max_video_upload_bytes: u64,
    pub max_thumbnail_upload_bytes: u64,
    // Presigned URL lifetime
    pub signed_url_expiry_secs: u64,
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("Missing required environment variable {}", name))
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_var_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            server_port: parsed_var_or("PORT", DEFAULT_PORT),
            environment: var_or("ENVIRONMENT", "development"),
            database_url: required_var("DATABASE_URL")?,
            db_max_connections: parsed_var_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            db_timeout_seconds: parsed_var_or("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS),
            jwt_secret: required_var("JWT_SECRET")?,
            s3_bucket: required_var("S3_BUCKET")?,
            s3_region: var_or("S3_REGION", "us-east-1"),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            assets_root: PathBuf::from(var_or("ASSETS_ROOT", "./assets")),
            assets_base_url: var_or("ASSETS_BASE_URL", "http://localhost:8091/assets"),
            ffmpeg_path: var_or("FFMPEG_PATH", "ffmpeg"),
            ffprobe_path: var_or("FFPROBE_PATH", "ffprobe"),
            tool_timeout_secs: parsed_var_or("TOOL_TIMEOUT_SECS", DEFAULT_TOOL_TIMEOUT_SECS),
            max_video_upload_bytes: parsed_var_or(
                "MAX_VIDEO_UPLOAD_BYTES",
                DEFAULT_MAX_VIDEO_UPLOAD_BYTES,
            ),
            max_thumbnail_upload_bytes: parsed_var_or(
                "MAX_THUMBNAIL_UPLOAD_BYTES",
                DEFAULT_MAX_THUMBNAIL_UPLOAD_BYTES,
            ),
            signed_url_expiry_secs: parsed_var_or(
                "SIGNED_URL_EXPIRY_SECS",
                DEFAULT_SIGNED_URL_EXPIRY_SECS,
            ),
        })
    }

    /// Fail fast on misconfiguration before any listener is bound.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < 32 {
            bail!("JWT_SECRET must be at least 32 bytes");
        }
        if self.s3_bucket.is_empty() {
            bail!("S3_BUCKET must not be empty");
        }
        if self.s3_bucket.contains(',') {
            bail!("S3_BUCKET must not contain ',' (reserved as the stored reference delimiter)");
        }
        if self.max_video_upload_bytes == 0 || self.max_thumbnail_upload_bytes == 0 {
            bail!("Upload size limits must be greater than zero");
        }
        if self.tool_timeout_secs == 0 {
            bail!("TOOL_TIMEOUT_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 8091,
            environment: "test".into(),
            database_url: "postgres://localhost/clipshelf".into(),
            db_max_connections: 5,
            db_timeout_seconds: 5,
            jwt_secret: "0123456789abcdef0123456789abcdef".into(),
            s3_bucket: "clipshelf-media".into(),
            s3_region: "us-east-1".into(),
            s3_endpoint: None,
            assets_root: PathBuf::from("./assets"),
            assets_base_url: "http://localhost:8091/assets".into(),
            ffmpeg_path: "ffmpeg".into(),
            ffprobe_path: "ffprobe".into(),
            tool_timeout_secs: 120,
            max_video_upload_bytes: 1 << 30,
            max_thumbnail_upload_bytes: 10 << 20,
            signed_url_expiry_secs: 3600,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn short_jwt_secret_rejected() {
        let mut config = base_config();
        config.jwt_secret = "short".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bucket_with_delimiter_rejected() {
        let mut config = base_config();
        config.s3_bucket = "bad,bucket".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn production_detection() {
        let mut config = base_config();
        config.environment = "Production".into();
        assert!(config.is_production());
        config.environment = "development".into();
        assert!(!config.is_production());
    }
}

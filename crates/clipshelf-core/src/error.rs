//! Error types module
//!
//! All failures in the ingestion pipeline and the HTTP surface are unified
//! under the `AppError` enum. Each variant knows its HTTP status code, a
//! machine-readable error code, and the log level it should be reported at,
//! so the api crate can render responses and log uniformly.

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Staging failure: {0}")]
    Staging(String),

    #[error("Probe failure: {0}")]
    Probe(String),

    #[error("Remux failure: {0}")]
    Remux(String),

    #[error("Upload failure: {0}")]
    Upload(String),

    #[error("Malformed storage reference: {0}")]
    MalformedReference(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// HTTP status code to return for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidId(_)
            | AppError::InvalidMediaType(_)
            | AppError::InvalidInput(_) => 400,
            AppError::Unauthenticated(_) => 401,
            AppError::Unauthorized(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::PayloadTooLarge(_) => 413,
            AppError::Database(_)
            | AppError::Staging(_)
            | AppError::Probe(_)
            | AppError::Remux(_)
            | AppError::Upload(_)
            | AppError::MalformedReference(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => 500,
        }
    }

    /// Machine-readable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::InvalidId(_) => "INVALID_ID",
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InvalidMediaType(_) => "INVALID_MEDIA_TYPE",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Staging(_) => "STAGING_FAILURE",
            AppError::Probe(_) => "PROBE_FAILURE",
            AppError::Remux(_) => "REMUX_FAILURE",
            AppError::Upload(_) => "UPLOAD_FAILURE",
            AppError::MalformedReference(_) => "MALFORMED_REFERENCE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    /// Log level for this error. Client mistakes are logged at debug,
    /// resource limits at warn, everything unexpected at error.
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidId(_)
            | AppError::Unauthenticated(_)
            | AppError::Unauthorized(_)
            | AppError::InvalidMediaType(_)
            | AppError::InvalidInput(_)
            | AppError::NotFound(_) => LogLevel::Debug,
            AppError::PayloadTooLarge(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    /// Client-facing message. Server-side failures are collapsed to a generic
    /// message so internals never leak through the API.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            AppError::MalformedReference(_) => {
                "Stored media reference is invalid".to_string()
            }
            AppError::Staging(_) => "Unable to save upload".to_string(),
            AppError::Probe(_) => "Unable to inspect video".to_string(),
            AppError::Remux(_) => "Unable to process video".to_string(),
            AppError::Upload(_) => "Unable to store video".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => AppError::NotFound("Record not found".to_string()),
            other => AppError::Database(other),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

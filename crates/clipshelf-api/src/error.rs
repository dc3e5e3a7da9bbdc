//! HTTP error response conversion
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` (or types that implement `Into<HttpAppError>`) for errors so
//! they render consistently (status, body, logging).

use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clipshelf_core::{AppError, LogLevel};
use clipshelf_processing::{ProbeError, RemuxError, StagingError, ValidationError};
use clipshelf_storage::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type for AppError to implement IntoResponse.
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from clipshelf-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Convert JSON body deserialization failures into a 400 with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpAppError(AppError::PayloadTooLarge(err.body_text()));
        }
        HttpAppError(AppError::InvalidInput(format!(
            "Malformed multipart body: {}",
            err.body_text()
        )))
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::UploadFailed(msg) => AppError::Upload(msg),
            StorageError::DeleteFailed(msg) => AppError::Upload(msg),
            StorageError::BackendError(msg) => AppError::Upload(msg),
            StorageError::MalformedReference(msg) => AppError::MalformedReference(msg),
            StorageError::InvalidKey(msg) => AppError::Internal(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let ValidationError::InvalidMediaType(media_type) = err;
        HttpAppError(AppError::InvalidMediaType(media_type))
    }
}

impl From<StagingError> for HttpAppError {
    fn from(err: StagingError) -> Self {
        let app = match err {
            StagingError::PayloadTooLarge { limit } => {
                AppError::PayloadTooLarge(format!("Upload exceeds limit of {} bytes", limit))
            }
            StagingError::Stream(msg) => AppError::Staging(msg),
            StagingError::Io(err) => AppError::Staging(format!("IO error: {}", err)),
        };
        HttpAppError(app)
    }
}

impl From<ProbeError> for HttpAppError {
    fn from(err: ProbeError) -> Self {
        HttpAppError(AppError::Probe(err.to_string()))
    }
}

impl From<RemuxError> for HttpAppError {
    fn from(err: RemuxError) -> Self {
        HttpAppError(AppError::Remux(err.to_string()))
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on
/// deserialization failure, instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_code = error_code, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_code = error_code, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_code = error_code, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // client_message already collapses server-side failures to a generic
        // message, so internals never reach the wire.
        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            code: app_error.error_code().to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_limit_maps_to_payload_too_large() {
        let err: HttpAppError = StagingError::PayloadTooLarge { limit: 1024 }.into();
        assert_eq!(err.0.http_status_code(), 413);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err: HttpAppError = ValidationError::InvalidMediaType("video/webm".into()).into();
        assert_eq!(err.0.http_status_code(), 400);
        assert_eq!(err.0.error_code(), "INVALID_MEDIA_TYPE");
    }

    #[test]
    fn probe_and_remux_map_to_server_errors() {
        let err: HttpAppError = ProbeError::NoVideoStream.into();
        assert_eq!(err.0.http_status_code(), 500);
        assert_eq!(err.0.error_code(), "PROBE_FAILURE");

        let err: HttpAppError = RemuxError::Failed("boom".into()).into();
        assert_eq!(err.0.error_code(), "REMUX_FAILURE");
    }

    #[test]
    fn malformed_reference_is_internal() {
        let err: HttpAppError = StorageError::MalformedReference("no delimiter".into()).into();
        assert_eq!(err.0.http_status_code(), 500);
        assert_eq!(err.0.error_code(), "MALFORMED_REFERENCE");
    }
}

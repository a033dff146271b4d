//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Crate errors
//! (storage, ingest) convert into [`AppError`] first so every failure renders
//! with the same status mapping, body shape, and log level.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catflow_core::{AppError, ErrorMetadata, LogLevel};
use catflow_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::ingest::IngestError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of the failure
    pub detail: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Reduce file size")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    pub fn from_app_error(error: &AppError) -> Self {
        Self {
            detail: error.client_message(),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from catflow-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(AppError::Storage(err.to_string()))
    }
}

impl From<IngestError> for HttpAppError {
    fn from(err: IngestError) -> Self {
        HttpAppError(err.into())
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(ErrorResponse::from_app_error(app_error))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_is_500_with_verbatim_detail() {
        let err = HttpAppError::from(StorageError::UploadFailed("bucket missing".to_string()));
        let body = ErrorResponse::from_app_error(&err.0);
        assert_eq!(err.0.http_status_code(), 500);
        assert_eq!(body.code, "STORAGE_ERROR");
        assert!(body.detail.contains("bucket missing"));
    }

    #[test]
    fn test_response_status_follows_metadata() {
        let response =
            HttpAppError(AppError::InvalidInput("No file provided".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            HttpAppError(AppError::PayloadTooLarge("too big".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response =
            HttpAppError(AppError::Connectivity("down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_serialization() {
        let body = ErrorResponse::from_app_error(&AppError::Connectivity("refused".to_string()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["detail"], "Broker connectivity error: refused");
        assert_eq!(json["code"], "BROKER_CONNECTIVITY_ERROR");
        assert_eq!(json["recoverable"], true);
    }
}

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::middleware::RequestId;
use crate::services::ingest::IncomingFile;
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, validate_file_size};

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    #[schema(example = "success")]
    pub status: String,
}

impl IngestResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// Ingest a file
///
/// Stores the uploaded file under a fresh key that keeps its extension, then
/// announces the key on every configured routing key.
///
/// # Errors
/// - `AppError::InvalidInput` - No `file` field or unreadable multipart body
/// - `AppError::PayloadTooLarge` - File exceeds `MAX_UPLOAD_SIZE_MB`
/// - `AppError::Storage` - Upload to the object store failed, nothing announced
/// - `AppError::Connectivity` - Broker not connected, nothing stored
/// - `AppError::PartialAnnouncement` - Stored, but an announcement failed
#[utoipa::path(
    post,
    path = "/ingest",
    tag = "ingest",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored and announced", body = IngestResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Upload or announcement failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request_id, multipart),
    fields(
        operation = "ingest",
        request_id = request_id.as_ref().map(|Extension(id)| id.0.as_str()).unwrap_or("-")
    )
)]
pub async fn ingest_file(
    State(state): State<Arc<AppState>>,
    request_id: Option<Extension<RequestId>>,
    multipart: Multipart,
) -> Result<Json<IngestResponse>, HttpAppError> {
    let upload = extract_multipart_file(multipart).await?;
    validate_file_size(upload.data.len(), state.config.max_upload_size_bytes())?;

    let receipt = state
        .ingest
        .ingest(IncomingFile {
            filename: upload.filename,
            content_type: upload.content_type,
            data: upload.data,
        })
        .await?;

    tracing::debug!(
        key = %receipt.key,
        announcements = receipt.announcements,
        "Ingest request completed"
    );

    Ok(Json(IngestResponse::success()))
}

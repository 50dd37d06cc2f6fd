use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::{RejectedFile, UploadOutcome, UploadReceiver, UploadedFile};
use crate::state::AppState;

/// One accepted file in the upload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedFileResponse {
    /// Filename as sent by the client.
    #[serde(rename = "originalName")]
    pub original_name: String,
    /// On-disk storage name.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    #[serde(rename = "uploadDate")]
    pub upload_date: DateTime<Utc>,
}

impl From<UploadedFile> for UploadedFileResponse {
    fn from(uploaded: UploadedFile) -> Self {
        UploadedFileResponse {
            original_name: uploaded.original_name,
            filename: uploaded.storage_name,
            size: uploaded.size_bytes,
            upload_date: uploaded.uploaded_at,
        }
    }
}

/// One rejected file in the upload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RejectedFileResponse {
    pub name: String,
    pub reason: String,
}

impl From<RejectedFile> for RejectedFileResponse {
    fn from(rejected: RejectedFile) -> Self {
        RejectedFileResponse {
            name: rejected.name,
            reason: rejected.reason,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<UploadedFileResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedFileResponse>,
}

impl From<UploadOutcome> for UploadResponse {
    fn from(outcome: UploadOutcome) -> Self {
        UploadResponse {
            message: format!("{} file(s) uploaded successfully", outcome.accepted.len()),
            files: outcome
                .accepted
                .into_iter()
                .map(UploadedFileResponse::from)
                .collect(),
            rejected: outcome
                .rejected
                .into_iter()
                .map(RejectedFileResponse::from)
                .collect(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Files uploaded", body = UploadResponse),
        (status = 400, description = "No files, blocked file type, or too many files", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let receiver = UploadReceiver::new(state.store.clone(), &state.config);
    let outcome = receiver.receive(multipart).await?;

    tracing::info!(
        accepted = outcome.accepted.len(),
        rejected = outcome.rejected.len(),
        "Upload request complete"
    );

    Ok(Json(UploadResponse::from(outcome)))
}

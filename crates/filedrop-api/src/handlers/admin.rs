use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}

#[utoipa::path(
    delete,
    path = "/admin/files/{filename}",
    tag = "admin",
    params(
        ("filename" = String, Path, description = "Display name of the stored file")
    ),
    security(("admin_token" = [])),
    responses(
        (status = 200, description = "File deleted", body = DeleteResponse),
        (status = 401, description = "Missing or invalid admin credential", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    // Same newest-first tie-break as downloads: with duplicate display names
    // the most recent upload is the one removed.
    let entry = state.store.resolve(&filename).await?;
    state.store.remove(&entry.storage_name).await?;

    tracing::info!(
        display_name = %entry.display_name,
        storage_name = %entry.storage_name,
        "Admin deleted stored file"
    );

    Ok(Json(DeleteResponse {
        message: format!("Deleted {}", entry.display_name),
    }))
}

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use filedrop_core::ListingEntry;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// One stored file as returned by `GET /files`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileSummary {
    /// Display name (timestamp prefix stripped).
    pub name: String,
    /// On-disk storage name.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub date: DateTime<Utc>,
}

impl From<ListingEntry> for FileSummary {
    fn from(entry: ListingEntry) -> Self {
        FileSummary {
            name: entry.display_name,
            filename: entry.storage_name,
            size: entry.size_bytes,
            date: entry.modified_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    responses(
        (status = 200, description = "Stored files, newest first", body = [FileSummary]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FileSummary>>, HttpAppError> {
    let entries = state.store.list().await?;
    Ok(Json(entries.into_iter().map(FileSummary::from).collect()))
}

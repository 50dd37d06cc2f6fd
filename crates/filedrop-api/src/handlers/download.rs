use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use filedrop_core::media_type::{self, ContentType};
use filedrop_core::range::{self, ByteRange, RangePlan};
use filedrop_core::{AppError, ListingEntry};
use futures::StreamExt;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/download/{filename}",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Display name of the stored file"),
        ("Range" = Option<String>, Header, description = "Optional byte range, e.g. bytes=0-1023")
    ),
    responses(
        (status = 200, description = "Whole file", content_type = "application/octet-stream"),
        (status = 206, description = "Requested byte range", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 416, description = "Range not satisfiable")
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    // LOOKUP: fresh directory read; duplicate display names resolve to the
    // newest upload.
    let entry = state.store.resolve(&filename).await?;

    // CLASSIFY
    let content_type = media_type::classify(&entry.display_name);

    // RANGE: planned against the size from the stat above.
    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    match range::plan(range_header, entry.size_bytes) {
        RangePlan::Unsatisfiable { total } => {
            tracing::debug!(
                file = %entry.storage_name,
                range = ?range_header,
                total = total,
                "Unsatisfiable range request"
            );
            Err(AppError::RangeNotSatisfiable { total }.into())
        }
        RangePlan::NotRequested => {
            stream_span(&state, &entry, content_type, 0, entry.size_bytes, None).await
        }
        RangePlan::Satisfiable(span) => {
            stream_span(
                &state,
                &entry,
                content_type,
                span.start,
                span.len(),
                Some(span),
            )
            .await
        }
    }
}

/// HEADERS + STREAM: open the storage file, seek to `start`, and stream
/// exactly `length` bytes to the client.
///
/// Each request holds its own file handle and read position, so concurrent
/// range requests against the same file proceed independently. A failure
/// after headers are sent (client gone, disk fault) aborts only this copy
/// loop; the handle drops with the stream.
async fn stream_span(
    state: &AppState,
    entry: &ListingEntry,
    content_type: ContentType,
    start: u64,
    length: u64,
    span: Option<ByteRange>,
) -> Result<Response, HttpAppError> {
    let (file, _total) = state.store.open_span(&entry.storage_name, start).await?;

    let storage_name = entry.storage_name.clone();
    let stream = ReaderStream::new(file.take(length)).map(move |chunk| {
        if let Err(e) = &chunk {
            tracing::error!(
                error = %e,
                storage_name = %storage_name,
                "Stream aborted mid-transfer"
            );
        }
        chunk
    });

    let status = if span.is_some() {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };

    let disposition = if content_type.category.is_inline() {
        format!("inline; filename=\"{}\"", entry.display_name)
    } else {
        format!("attachment; filename=\"{}\"", entry.display_name)
    };

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type.mime)
        .header(header::CONTENT_LENGTH, length)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CACHE_CONTROL, "public, max-age=86400");

    if content_type.category.is_inline() {
        builder = builder.header(header::ACCEPT_RANGES, "bytes");
    }
    if let Some(span) = span {
        builder = builder.header(header::CONTENT_RANGE, span.content_range());
    }

    builder
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
}

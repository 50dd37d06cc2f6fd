//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; domain errors
//! (`AppError`, `StoreError`) convert into `HttpAppError` via `?` and render
//! consistently as `{"error": <message>}` JSON with the status from the error
//! taxonomy. The one shape exception is 416, which carries a
//! `Content-Range: bytes */<total>` header and an empty body.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use filedrop_core::{AppError, LogLevel};
use filedrop_storage::StoreError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse.
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from filedrop-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<StoreError> for HttpAppError {
    fn from(err: StoreError) -> Self {
        let app = match err {
            StoreError::NotFound(name) => AppError::NotFound(format!("File not found: {}", name)),
            StoreError::InvalidName(name) => {
                AppError::InvalidInput(format!("Invalid filename: {}", name))
            }
            StoreError::AlreadyExists(name) => {
                AppError::Storage(format!("Destination already exists: {}", name))
            }
            StoreError::Io(e) => AppError::Storage(format!("IO error: {}", e)),
            StoreError::Config(msg) => AppError::Storage(msg),
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        log_error(app_error);

        // 416 must carry the total size and no body; everything else is JSON.
        if let AppError::RangeNotSatisfiable { total } = app_error {
            let mut response = StatusCode::RANGE_NOT_SATISFIABLE.into_response();
            if let Ok(value) = HeaderValue::from_str(&format!("bytes */{}", total)) {
                response.headers_mut().insert(header::CONTENT_RANGE, value);
            }
            return response;
        }

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(ErrorResponse::new(app_error.client_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_app_not_found() {
        let HttpAppError(app) = StoreError::NotFound("a.txt".to_string()).into();
        assert!(matches!(app, AppError::NotFound(_)));
        assert_eq!(app.http_status_code(), 404);
    }

    #[test]
    fn store_invalid_name_maps_to_invalid_input() {
        let HttpAppError(app) = StoreError::InvalidName("../x".to_string()).into();
        assert!(matches!(app, AppError::InvalidInput(_)));
        assert_eq!(app.http_status_code(), 400);
    }

    #[test]
    fn store_io_error_is_hidden_from_clients() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let HttpAppError(app) = StoreError::Io(io_err).into();
        assert_eq!(app.http_status_code(), 500);
        assert_eq!(app.client_message(), "Internal server error");
    }

    #[test]
    fn unsatisfiable_range_response_has_content_range_and_no_body() {
        let response =
            HttpAppError(AppError::RangeNotSatisfiable { total: 1000 }).into_response();
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_RANGE)
                .and_then(|v| v.to_str().ok()),
            Some("bytes */1000")
        );
    }

    #[test]
    fn error_response_serializes_to_error_field() {
        let json = serde_json::to_value(ErrorResponse::new("File type not allowed")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "File type not allowed"}));
    }
}

//! Admin auth gate.
//!
//! Admin routes are protected by a single shared secret presented as
//! `Authorization: Bearer <secret>`. The secret lives in `Config` and is
//! handed to the gate at construction; comparison is constant-time.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use filedrop_core::AppError;
use subtle::ConstantTimeEq;

use crate::error::HttpAppError;

/// Holds the shared admin secret for the lifetime of the server.
pub struct AdminGate {
    secret: String,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Constant-time comparison; differing lengths compare unequal without
    /// leaking more than the length itself.
    fn verify(&self, presented: &str) -> bool {
        presented.as_bytes().ct_eq(self.secret.as_bytes()).into()
    }
}

/// Middleware guarding admin routes.
pub async fn admin_auth_middleware(
    State(gate): State<Arc<AdminGate>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(secret) if gate.verify(secret) => next.run(request).await,
        _ => {
            tracing::warn!(path = %request.uri().path(), "Rejected admin request with missing or invalid credential");
            HttpAppError(AppError::Unauthorized(
                "Invalid admin credential".to_string(),
            ))
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_exact_secret() {
        let gate = AdminGate::new("hunter2");
        assert!(gate.verify("hunter2"));
    }

    #[test]
    fn verify_rejects_wrong_or_partial_secret() {
        let gate = AdminGate::new("hunter2");
        assert!(!gate.verify("hunter"));
        assert!(!gate.verify("hunter22"));
        assert!(!gate.verify(""));
    }
}

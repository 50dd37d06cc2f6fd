//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post},
    Json, Router,
};
use filedrop_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::api_doc::ApiDoc;
use crate::auth::{admin_auth_middleware, AdminGate};
use crate::handlers;
use crate::middleware::rate_limit::{rate_limit_middleware, HttpRateLimiter};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let gate = Arc::new(AdminGate::new(config.admin_secret.clone()));
    let rate_limiter = Arc::new(HttpRateLimiter::new(config.rate_limit_per_minute));

    // Admin routes sit behind the shared-secret gate.
    let admin_routes = Router::new()
        .route(
            "/admin/files/{filename}",
            delete(handlers::admin::delete_file),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            gate,
            admin_auth_middleware,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        // Uploads have no size cap (the receiver streams to disk), so the
        // default body limit must come off this route.
        .route(
            "/upload",
            post(handlers::upload::upload_files).layer(DefaultBodyLimit::disable()),
        )
        .route("/files", get(handlers::listing::list_files))
        .route(
            "/download/{filename}",
            get(handlers::download::download_file),
        )
        .merge(admin_routes)
        .with_state(state);

    let docs_routes = Router::new()
        .route("/api/openapi.json", get(openapi_json))
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"));

    let app = api_routes
        .merge(docs_routes)
        .layer(axum::middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    if config.cors_origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

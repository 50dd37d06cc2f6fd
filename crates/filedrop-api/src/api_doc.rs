//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;

/// Registers the bearer scheme used by the admin endpoints.
struct AdminSecurity;

impl Modify for AdminSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Shared admin secret"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filedrop API",
        version = "0.1.0",
        description = "Self-hosted file sharing: upload files of arbitrary size, list them, stream or download them with HTTP range support, and delete them through the admin gate."
    ),
    paths(
        handlers::upload::upload_files,
        handlers::listing::list_files,
        handlers::download::download_file,
        handlers::admin::delete_file,
        handlers::health::health,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::upload::UploadResponse,
        handlers::upload::UploadedFileResponse,
        handlers::upload::RejectedFileResponse,
        handlers::listing::FileSummary,
        handlers::admin::DeleteResponse,
        handlers::health::HealthResponse,
    )),
    modifiers(&AdminSecurity),
    tags(
        (name = "files", description = "Upload, list, and download stored files"),
        (name = "admin", description = "Secret-gated administration"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

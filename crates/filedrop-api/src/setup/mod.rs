//! Application setup and initialization
//!
//! All startup logic lives here rather than in main.rs: configuration
//! validation, telemetry, storage, and route construction.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use filedrop_core::Config;
use filedrop_storage::FileStore;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let store = FileStore::new(&config.storage_dir)
        .await
        .context("Failed to initialize storage directory")?;

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

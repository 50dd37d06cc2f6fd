//! Test helpers: build AppState and router for integration tests.
//!
//! Run from the workspace root with `cargo test -p filedrop-api`. Each test
//! gets its own temp storage directory; no external services are required.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use filedrop_api::setup::routes::setup_routes;
use filedrop_api::state::AppState;
use filedrop_core::Config;
use filedrop_storage::FileStore;
use tempfile::TempDir;

pub const TEST_ADMIN_SECRET: &str = "test-admin-secret";

/// Test application: server plus the owned storage directory.
pub struct TestApp {
    pub server: TestServer,
    pub storage_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    /// Names of the files currently on disk in the storage root.
    pub fn stored_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.storage_dir)
            .expect("read storage dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }
}

/// Setup a test app with default configuration.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup a test app, letting the caller tweak the configuration first.
pub async fn setup_test_app_with(mutate: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_dir = temp_dir.path().to_path_buf();

    let mut config = test_config(&storage_dir);
    mutate(&mut config);
    config.validate().expect("test config must validate");

    let store = FileStore::new(&storage_dir)
        .await
        .expect("Failed to create file store");

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
    });

    let router = setup_routes(&config, state).expect("Failed to set up routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        storage_dir,
        _temp_dir: temp_dir,
    }
}

fn test_config(storage_dir: &Path) -> Config {
    Config {
        server_port: 0,
        storage_dir: storage_dir.to_path_buf(),
        admin_secret: TEST_ADMIN_SECRET.to_string(),
        max_files_per_upload: 20,
        blocked_extensions: vec![
            "exe".to_string(),
            "bat".to_string(),
            "cmd".to_string(),
            "scr".to_string(),
            "pif".to_string(),
            "com".to_string(),
            "vbs".to_string(),
            "jar".to_string(),
        ],
        rate_limit_per_minute: 10_000,
        cors_origins: vec!["*".to_string()],
        http_concurrency_limit: 100,
        environment: "test".to_string(),
    }
}

/// A multipart form carrying a single file part.
pub fn form_with_file(file_name: &str, contents: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part("files", Part::bytes(contents.to_vec()).file_name(file_name))
}

/// Add one more file part to an existing form.
pub fn add_file(form: MultipartForm, file_name: &str, contents: &[u8]) -> MultipartForm {
    form.add_part("files", Part::bytes(contents.to_vec()).file_name(file_name))
}

/// Deterministic non-repeating payload for range assertions.
pub fn pattern_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

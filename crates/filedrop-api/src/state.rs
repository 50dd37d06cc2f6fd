//! Application state shared across request handlers.

use filedrop_core::Config;
use filedrop_storage::FileStore;

/// Main application state: configuration plus the directory-backed file
/// store. There is no other cross-request state; the storage directory is
/// the single source of truth.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: FileStore,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}

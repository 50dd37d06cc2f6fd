//! Filesystem storage for filedrop.
//!
//! The storage directory is the single source of truth: no in-memory index
//! is kept between requests, every listing and lookup re-reads the directory,
//! and the only synchronization point between concurrent requests is the
//! filesystem itself.

mod error;
mod local;

pub use error::{StoreError, StoreResult};
pub use local::FileStore;

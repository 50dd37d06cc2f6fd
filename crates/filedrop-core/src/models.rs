//! Domain models shared between the storage layer and the API.

use chrono::{DateTime, Utc};

/// One stored file as projected from the storage directory.
///
/// Recomputed from a fresh directory read on every listing or lookup; never
/// cached between requests. Two entries may share a `display_name` (duplicate
/// uploads) and are told apart only by `storage_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Human-readable name shown to clients, recovered from `storage_name`.
    pub display_name: String,
    /// On-disk filename: `<epoch-millis>_<sanitized-name>`.
    pub storage_name: String,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
}

//! Storage-name codec.
//!
//! Uploaded files are stored under `<epoch-millis>_<sanitized-name>` so that
//! re-uploading the same name never overwrites an earlier file and the
//! original (sanitized) name can be recovered from the on-disk name alone.
//! Two uploads of the same name within the same millisecond collide; the
//! exclusive-create in the storage layer turns that into a request failure
//! instead of silent corruption.

use chrono::{DateTime, Utc};

/// Replace every character outside `[A-Za-z0-9.-]` with `_`.
///
/// Idempotent: sanitizing twice equals sanitizing once. The result contains
/// no path separators, so it is always a single filesystem component.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Derive the storage name for `original_name` ingested at `at`.
pub fn encode_at(original_name: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}", at.timestamp_millis(), sanitize(original_name))
}

/// Derive the storage name for `original_name` ingested now.
pub fn encode(original_name: &str) -> String {
    encode_at(original_name, Utc::now())
}

/// Recover the display name from a storage name.
///
/// Strips one leading run of ASCII digits followed by a single underscore;
/// anything else passes through unchanged. Pure string work, no filesystem.
pub fn decode(storage_name: &str) -> &str {
    let digits = storage_name
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return storage_name;
    }
    match storage_name.as_bytes().get(digits) {
        Some(b'_') => &storage_name[digits + 1..],
        _ => storage_name,
    }
}

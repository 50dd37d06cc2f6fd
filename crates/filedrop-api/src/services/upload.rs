//! Upload receiver.
//!
//! Walks the multipart stream part by part with an explicit per-part outcome:
//! a part is either written to storage under a fresh timestamped name or
//! rejected (blocked extension) without persisting a single byte. Part bodies
//! stream to disk chunk by chunk, so files far larger than memory pass
//! through in constant space. The only all-or-nothing rule is the per-request
//! file count: exceeding it fails the request and removes everything the
//! request had already written.

use std::path::Path;

use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use filedrop_core::{naming, AppError, Config};
use filedrop_storage::{FileStore, StoreError};
use tokio::io::AsyncWriteExt;

/// One file accepted and persisted by the receiver.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename, as sent.
    pub original_name: String,
    /// Sanitized name shown in listings.
    pub display_name: String,
    /// On-disk name.
    pub storage_name: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// One file turned away before any byte was written.
#[derive(Debug, Clone)]
pub struct RejectedFile {
    pub name: String,
    pub reason: String,
}

/// Aggregated per-part outcomes for one upload request.
#[derive(Debug, Default)]
pub struct UploadOutcome {
    pub accepted: Vec<UploadedFile>,
    pub rejected: Vec<RejectedFile>,
}

const BLOCKED_REASON: &str = "File type not allowed";

/// Streams multipart uploads into the file store.
pub struct UploadReceiver {
    store: FileStore,
    max_files: usize,
    blocked_extensions: Vec<String>,
}

impl UploadReceiver {
    pub fn new(store: FileStore, config: &Config) -> Self {
        Self {
            store,
            max_files: config.max_files_per_upload,
            blocked_extensions: config.blocked_extensions.clone(),
        }
    }

    /// Consume the multipart stream and persist every acceptable file part.
    ///
    /// Fails the whole request on: too many file parts, a broken multipart
    /// stream, or a disk error mid-write. In each failure case the files this
    /// request had already written are removed again.
    pub async fn receive(&self, mut multipart: Multipart) -> Result<UploadOutcome, AppError> {
        let mut outcome = UploadOutcome::default();
        let mut file_parts = 0usize;

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    self.discard(&outcome.accepted).await;
                    return Err(AppError::InvalidInput(format!(
                        "Failed to read multipart stream: {}",
                        e
                    )));
                }
            };

            // Fields without a filename are form metadata, not uploads.
            let Some(original_name) = field.file_name().map(str::to_owned) else {
                continue;
            };

            file_parts += 1;
            if file_parts > self.max_files {
                self.discard(&outcome.accepted).await;
                return Err(AppError::InvalidInput(format!(
                    "Too many files: at most {} per request",
                    self.max_files
                )));
            }

            if let Some(extension) = self.blocked_extension(&original_name) {
                tracing::warn!(
                    filename = %original_name,
                    extension = %extension,
                    "Rejected upload with blocked extension"
                );
                outcome.rejected.push(RejectedFile {
                    name: original_name,
                    reason: BLOCKED_REASON.to_string(),
                });
                continue;
            }

            let uploaded = match self.write_part(field, &original_name).await {
                Ok(uploaded) => uploaded,
                Err(e) => {
                    self.discard(&outcome.accepted).await;
                    return Err(e);
                }
            };

            tracing::info!(
                original_name = %uploaded.original_name,
                storage_name = %uploaded.storage_name,
                size_bytes = uploaded.size_bytes,
                "Stored uploaded file"
            );

            outcome.accepted.push(uploaded);
        }

        if outcome.accepted.is_empty() {
            if outcome.rejected.is_empty() {
                return Err(AppError::InvalidInput("No files uploaded".to_string()));
            }
            return Err(AppError::InvalidInput(BLOCKED_REASON.to_string()));
        }

        Ok(outcome)
    }

    /// Stream one part body into an exclusively-created storage file.
    async fn write_part(
        &self,
        mut field: axum::extract::multipart::Field<'_>,
        original_name: &str,
    ) -> Result<UploadedFile, AppError> {
        let uploaded_at = Utc::now();
        let storage_name = naming::encode_at(original_name, uploaded_at);

        let mut file = self
            .store
            .create_exclusive(&storage_name)
            .await
            .map_err(|e| match e {
                // Same name sanitized identically in the same millisecond; a
                // known race, surfaced instead of overwriting.
                StoreError::AlreadyExists(name) => {
                    AppError::Storage(format!("Concurrent upload collision on {}", name))
                }
                other => AppError::Storage(format!("Failed to create storage file: {}", other)),
            })?;

        let mut size_bytes: u64 = 0;
        loop {
            let chunk = match field.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    self.remove_partial(&storage_name).await;
                    return Err(AppError::InvalidInput(format!(
                        "Failed to read upload stream: {}",
                        e
                    )));
                }
            };
            if let Err(e) = file.write_all(&chunk).await {
                self.remove_partial(&storage_name).await;
                return Err(AppError::Storage(format!(
                    "Failed to write uploaded file: {}",
                    e
                )));
            }
            size_bytes += chunk.len() as u64;
        }

        if let Err(e) = file.sync_all().await {
            self.remove_partial(&storage_name).await;
            return Err(AppError::Storage(format!(
                "Failed to sync uploaded file: {}",
                e
            )));
        }

        Ok(UploadedFile {
            original_name: original_name.to_string(),
            display_name: naming::decode(&storage_name).to_string(),
            storage_name,
            size_bytes,
            uploaded_at,
        })
    }

    fn blocked_extension(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)?;
        self.blocked_extensions
            .contains(&extension)
            .then_some(extension)
    }

    /// Best-effort removal of files written earlier in a failed request.
    async fn discard(&self, accepted: &[UploadedFile]) {
        for uploaded in accepted {
            if let Err(e) = self.store.remove(&uploaded.storage_name).await {
                tracing::warn!(
                    error = %e,
                    storage_name = %uploaded.storage_name,
                    "Failed to clean up file after aborted upload request"
                );
            }
        }
    }

    async fn remove_partial(&self, storage_name: &str) {
        if let Err(e) = self.store.remove(storage_name).await {
            tracing::warn!(
                error = %e,
                storage_name = %storage_name,
                "Failed to remove partially written file"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn test_config() -> Config {
        Config {
            server_port: 0,
            storage_dir: PathBuf::new(),
            admin_secret: "secret".to_string(),
            max_files_per_upload: 20,
            blocked_extensions: vec!["exe".to_string(), "bat".to_string(), "jar".to_string()],
            rate_limit_per_minute: 100,
            cors_origins: vec!["*".to_string()],
            http_concurrency_limit: 100,
            environment: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn blocked_extension_matches_case_insensitively() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path()).await.unwrap();
        let receiver = UploadReceiver::new(store, &test_config());

        assert_eq!(
            receiver.blocked_extension("virus.exe"),
            Some("exe".to_string())
        );
        assert_eq!(
            receiver.blocked_extension("VIRUS.EXE"),
            Some("exe".to_string())
        );
        assert_eq!(receiver.blocked_extension("archive.tar.jar"), Some("jar".to_string()));
        assert_eq!(receiver.blocked_extension("notes.txt"), None);
        assert_eq!(receiver.blocked_extension("no-extension"), None);
    }
}

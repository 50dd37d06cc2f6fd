use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use filedrop_core::{naming, ListingEntry};
use tokio::fs;
use tokio::io::AsyncSeekExt;

use crate::error::{StoreError, StoreResult};

/// Flat-directory file store.
///
/// Every stored file lives directly under `base_path` with a
/// `<epoch-millis>_<sanitized-name>` filename. Listings and lookups perform a
/// fresh directory read plus a per-entry stat on each call, so results always
/// reflect the filesystem as it is right now. Writes go through
/// exclusive-create handles, which makes a same-millisecond name collision a
/// visible failure rather than a silent overwrite.
#[derive(Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new FileStore rooted at `base_path`, creating the directory
    /// if it does not exist yet.
    pub async fn new(base_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StoreError::Config(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(FileStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a storage name to a filesystem path.
    ///
    /// Storage names are single path components; anything carrying a
    /// separator or a `..` sequence is rejected before touching the disk.
    fn storage_path(&self, storage_name: &str) -> StoreResult<PathBuf> {
        if storage_name.is_empty()
            || storage_name.contains("..")
            || storage_name.contains('/')
            || storage_name.contains('\\')
        {
            return Err(StoreError::InvalidName(storage_name.to_string()));
        }
        Ok(self.base_path.join(storage_name))
    }

    /// List all stored files, newest modification first.
    ///
    /// Ties on the modification timestamp are broken by storage name
    /// descending; storage names embed ingestion millis, so the order stays
    /// deterministic even for sub-millisecond neighbors. Subdirectories and
    /// non-UTF-8 names in the storage root are skipped.
    pub async fn list(&self) -> StoreResult<Vec<ListingEntry>> {
        let mut dir = fs::read_dir(&self.base_path).await?;
        let mut entries = Vec::new();

        while let Some(dent) = dir.next_entry().await? {
            // A concurrent delete can race the stat; such entries just drop
            // out of this listing.
            let Ok(metadata) = dent.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let Some(storage_name) = dent.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let modified_at = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or(DateTime::UNIX_EPOCH);

            entries.push(ListingEntry {
                display_name: naming::decode(&storage_name).to_string(),
                storage_name,
                size_bytes: metadata.len(),
                modified_at,
            });
        }

        entries.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| b.storage_name.cmp(&a.storage_name))
        });

        tracing::debug!(count = entries.len(), "Listed storage directory");

        Ok(entries)
    }

    /// Resolve a display name to its newest stored entry.
    ///
    /// The requested name is sanitized first so URL-decoded originals (for
    /// example `My Report.PDF`) match their stored form. With duplicate
    /// display names the most recently uploaded file wins, matching the
    /// listing order.
    pub async fn resolve(&self, display_name: &str) -> StoreResult<ListingEntry> {
        let wanted = naming::sanitize(display_name);
        self.list()
            .await?
            .into_iter()
            .find(|entry| entry.display_name == wanted)
            .ok_or_else(|| StoreError::NotFound(display_name.to_string()))
    }

    /// Open a file for writing with exclusive-create semantics.
    ///
    /// Fails with `AlreadyExists` if the storage name is taken; concurrent
    /// uploads can therefore never overwrite one another.
    pub async fn create_exclusive(&self, storage_name: &str) -> StoreResult<fs::File> {
        let path = self.storage_path(storage_name)?;

        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    StoreError::AlreadyExists(storage_name.to_string())
                } else {
                    StoreError::Io(e)
                }
            })
    }

    /// Open a stored file positioned at `start`, returning the handle and the
    /// file's current total size.
    ///
    /// The caller owns the read position; concurrent readers of the same file
    /// each get their own handle and proceed independently.
    pub async fn open_span(&self, storage_name: &str, start: u64) -> StoreResult<(fs::File, u64)> {
        let path = self.storage_path(storage_name)?;

        let mut file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(storage_name.to_string())
            } else {
                StoreError::Io(e)
            }
        })?;

        let total = file.metadata().await?.len();
        if start > 0 {
            file.seek(SeekFrom::Start(start)).await?;
        }

        Ok((file, total))
    }

    /// Remove a stored file. Deleting a name that is already gone is
    /// `NotFound`, not success.
    pub async fn remove(&self, storage_name: &str) -> StoreResult<()> {
        let path = self.storage_path(storage_name)?;

        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(storage_name.to_string())
            } else {
                StoreError::Io(e)
            }
        })?;

        tracing::info!(storage_name = %storage_name, "Removed stored file");

        Ok(())
    }
}

//! File-backed draft store
//!
//! Persists the full identity-to-draft mapping as one JSON document. Every
//! mutation reads the current mapping, applies the change, and writes the
//! whole document back; a single async mutex serializes those
//! read-modify-write cycles so concurrent commits cannot tear the file or
//! drop a version increment. Writes land in a sibling temp file first and
//! are renamed into place, so a crash mid-write leaves the previous mapping
//! intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::draft::{Draft, DraftData};
use crate::error::StoreError;
use crate::store::DraftStore;
use safeflow_identity::UserId;

/// Durable [`DraftStore`] backed by a single JSON file
#[derive(Debug)]
pub struct FileDraftStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileDraftStore {
    /// Create a store persisting to `path`
    ///
    /// The file and its parent directory are created lazily on the first
    /// commit; a store pointed at a missing file simply has no drafts.
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full mapping from disk
    ///
    /// A missing file is an empty mapping. A file that no longer parses is
    /// also treated as empty, though the condition is logged. Genuine I/O
    /// failures surface as [`StoreError::Unavailable`].
    async fn read_all(&self) -> Result<BTreeMap<UserId, Draft>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice(&raw) {
            Ok(map) => Ok(map),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "draft file unreadable, treating as empty");
                Ok(BTreeMap::new())
            }
        }
    }

    /// Write the full mapping back to disk atomically
    async fn write_all(&self, all: &BTreeMap<UserId, Draft>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let serialized = serde_json::to_vec_pretty(all)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &serialized).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DraftStore for FileDraftStore {
    async fn get(&self, user: &UserId) -> Result<Option<Draft>, StoreError> {
        let all = self.read_all().await?;
        Ok(all.get(user).cloned())
    }

    async fn put(&self, user: &UserId, data: DraftData) -> Result<Draft, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut all = self.read_all().await?;
        let prev_version = all.get(user).map(|d| d.version);
        let next = Draft::commit(data, prev_version);
        all.insert(user.clone(), next.clone());
        self.write_all(&all).await?;

        debug!(user = %user, version = next.version, "draft committed");
        Ok(next)
    }

    async fn delete(&self, user: &UserId) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut all = self.read_all().await?;
        if all.remove(user).is_some() {
            self.write_all(&all).await?;
            debug!(user = %user, "draft deleted");
        }
        Ok(())
    }
}

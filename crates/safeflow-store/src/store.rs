//! The draft storage contract

use crate::draft::{Draft, DraftData};
use crate::error::StoreError;
use safeflow_identity::UserId;

/// Durable keyed storage for one draft per user identity
///
/// # Contract
/// - `get` returns `Ok(None)` for identities that have never been written;
///   a missing key is never an error
/// - `put` creates the record at version 1, or replaces it at
///   `previous.version + 1`, stamping `saved_at` with the commit time.
///   Racing `put`/`delete` calls on the **same** identity must not produce a
///   torn record and must not lose a version increment; last-writer-wins on
///   the payload is acceptable
/// - `delete` is idempotent: removing a missing identity succeeds
///
/// Implementations that read-modify-write shared state must serialize those
/// mutations behind a mutual-exclusion scope to honor the atomicity clause.
#[async_trait::async_trait]
pub trait DraftStore: Send + Sync {
    /// Fetch the current draft for an identity, if one exists
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the backing cannot be reached.
    async fn get(&self, user: &UserId) -> Result<Option<Draft>, StoreError>;

    /// Create or replace the draft for an identity
    ///
    /// Returns the committed record, including its new version and save time.
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the commit cannot be written.
    async fn put(&self, user: &UserId, data: DraftData) -> Result<Draft, StoreError>;

    /// Remove the draft for an identity, if present
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the backing cannot be written.
    /// A missing record is not an error.
    async fn delete(&self, user: &UserId) -> Result<(), StoreError>;
}

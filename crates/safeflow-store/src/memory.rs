//! In-memory draft store
//!
//! The local backing: same contract as the file store, no durability. Used
//! for single-process deployments and as the fast test backing.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::draft::{Draft, DraftData};
use crate::error::StoreError;
use crate::store::DraftStore;
use safeflow_identity::UserId;

/// In-process [`DraftStore`] backed by a mutex-guarded map
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    inner: Mutex<HashMap<UserId, Draft>>,
}

impl MemoryDraftStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored drafts
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the store holds no drafts
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[async_trait::async_trait]
impl DraftStore for MemoryDraftStore {
    async fn get(&self, user: &UserId) -> Result<Option<Draft>, StoreError> {
        Ok(self.inner.lock().get(user).cloned())
    }

    async fn put(&self, user: &UserId, data: DraftData) -> Result<Draft, StoreError> {
        let mut inner = self.inner.lock();
        let prev_version = inner.get(user).map(|d| d.version);
        let next = Draft::commit(data, prev_version);
        inner.insert(user.clone(), next.clone());
        Ok(next)
    }

    async fn delete(&self, user: &UserId) -> Result<(), StoreError> {
        self.inner.lock().remove(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(email: &str) -> UserId {
        UserId::derive(email).unwrap()
    }

    fn payload(answer: &str) -> DraftData {
        DraftData::try_from(json!({"answer": answer, "agree": false})).unwrap()
    }

    #[tokio::test]
    async fn get_returns_none_for_unwritten_identity() {
        let store = MemoryDraftStore::new();
        let draft = store.get(&user("x@y.com")).await.unwrap();
        assert!(draft.is_none());
    }

    #[tokio::test]
    async fn put_sequence_counts_versions_and_keeps_last_payload() {
        let store = MemoryDraftStore::new();
        let id = user("x@y.com");

        for n in 1..=5u64 {
            let saved = store.put(&id, payload(&format!("draft {n}"))).await.unwrap();
            assert_eq!(saved.version, n);
        }

        let current = store.get(&id).await.unwrap().unwrap();
        assert_eq!(current.version, 5);
        assert_eq!(current.data.get("answer"), Some(&json!("draft 5")));
    }

    #[tokio::test]
    async fn delete_then_get_returns_none() {
        let store = MemoryDraftStore::new();
        let id = user("x@y.com");

        store.put(&id, payload("anything")).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryDraftStore::new();
        let id = user("x@y.com");

        store.put(&id, payload("anything")).await.unwrap();
        store.delete(&id).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn versions_restart_after_deletion() {
        let store = MemoryDraftStore::new();
        let id = user("x@y.com");

        store.put(&id, payload("one")).await.unwrap();
        store.put(&id, payload("two")).await.unwrap();
        store.delete(&id).await.unwrap();

        let saved = store.put(&id, payload("fresh")).await.unwrap();
        assert_eq!(saved.version, 1);
    }

    #[tokio::test]
    async fn identities_are_independent() {
        let store = MemoryDraftStore::new();
        let a = user("a@example.com");
        let b = user("b@example.com");

        store.put(&a, payload("from a")).await.unwrap();
        store.put(&a, payload("from a again")).await.unwrap();
        store.put(&b, payload("from b")).await.unwrap();

        assert_eq!(store.get(&a).await.unwrap().unwrap().version, 2);
        assert_eq!(store.get(&b).await.unwrap().unwrap().version, 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn version_equals_write_count(answers in proptest::collection::vec("[a-z ]{0,20}", 1..20)) {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                rt.block_on(async {
                    let store = MemoryDraftStore::new();
                    let id = user("prop@example.com");

                    for answer in &answers {
                        store.put(&id, payload(answer)).await.unwrap();
                    }

                    let current = store.get(&id).await.unwrap().unwrap();
                    assert_eq!(current.version, answers.len() as u64);
                    assert_eq!(
                        current.data.get("answer"),
                        Some(&json!(answers.last().unwrap()))
                    );
                });
            }
        }
    }
}

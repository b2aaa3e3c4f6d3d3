//! File store integration tests: durability, atomicity, degraded reads

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use safeflow_identity::UserId;
use safeflow_store::{DraftData, DraftStore, FileDraftStore};

fn user(email: &str) -> UserId {
    UserId::derive(email).unwrap()
}

fn payload(answer: &str) -> DraftData {
    DraftData::try_from(json!({"answer": answer, "agree": true})).unwrap()
}

#[tokio::test]
async fn missing_file_reads_as_no_draft() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileDraftStore::new(dir.path().join("drafts.json"));

    let draft = store.get(&user("x@y.com")).await.unwrap();
    assert!(draft.is_none());
}

#[tokio::test]
async fn commits_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("drafts.json");
    let id = user("x@y.com");

    {
        let store = FileDraftStore::new(&path);
        store.put(&id, payload("persisted")).await.unwrap();
        store.put(&id, payload("persisted twice")).await.unwrap();
    }

    let reopened = FileDraftStore::new(&path);
    let draft = reopened.get(&id).await.unwrap().unwrap();
    assert_eq!(draft.version, 2);
    assert_eq!(draft.data.get("answer"), Some(&json!("persisted twice")));
}

#[tokio::test]
async fn delete_then_get_returns_none_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileDraftStore::new(dir.path().join("drafts.json"));
    let id = user("x@y.com");

    store.put(&id, payload("temp")).await.unwrap();
    store.delete(&id).await.unwrap();
    store.delete(&id).await.unwrap();
    assert!(store.get(&id).await.unwrap().is_none());

    // Deleting an identity that never existed also succeeds.
    store.delete(&user("never@seen.com")).await.unwrap();
}

#[tokio::test]
async fn concurrent_commits_never_lose_a_version_increment() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileDraftStore::new(dir.path().join("drafts.json")));
    let id = user("x@y.com");

    let mut tasks = Vec::new();
    for n in 0..10 {
        let store = Arc::clone(&store);
        let id = id.clone();
        tasks.push(tokio::spawn(async move {
            store.put(&id, payload(&format!("writer {n}"))).await.unwrap()
        }));
    }

    let mut versions: Vec<u64> = Vec::new();
    for task in tasks {
        versions.push(task.await.unwrap().version);
    }
    versions.sort_unstable();

    // Every commit got a distinct version and the final record counts all of
    // them, regardless of arrival order.
    assert_eq!(versions, (1..=10).collect::<Vec<_>>());
    let current = store.get(&id).await.unwrap().unwrap();
    assert_eq!(current.version, 10);
}

#[tokio::test]
async fn corrupt_file_degrades_to_empty_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts.json");
    tokio::fs::write(&path, b"{ not json").await.unwrap();

    let store = FileDraftStore::new(&path);
    let id = user("x@y.com");
    assert!(store.get(&id).await.unwrap().is_none());

    // A fresh commit replaces the corrupt mapping and starts at version 1.
    let saved = store.put(&id, payload("recovered")).await.unwrap();
    assert_eq!(saved.version, 1);
}

#[tokio::test]
async fn distinct_identities_share_the_file_without_interference() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileDraftStore::new(dir.path().join("drafts.json"));
    let a = user("a@example.com");
    let b = user("b@example.com");

    store.put(&a, payload("a1")).await.unwrap();
    store.put(&b, payload("b1")).await.unwrap();
    store.put(&a, payload("a2")).await.unwrap();
    store.delete(&b).await.unwrap();

    assert_eq!(store.get(&a).await.unwrap().unwrap().version, 2);
    assert!(store.get(&b).await.unwrap().is_none());
}

//! Wire-level tests for the draft API

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use safeflow_identity::UserId;
use safeflow_server::app;
use safeflow_store::{FileDraftStore, MemoryDraftStore};
use safeflow_test_utils::FlakyStore;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn memory_app() -> axum::Router {
    app(Arc::new(MemoryDraftStore::new()))
}

fn user_id() -> String {
    UserId::derive("x@y.com").unwrap().into_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = memory_app()
        .oneshot(bare_request("GET", "/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"ok": true}));
}

#[tokio::test]
async fn login_derives_the_same_identity_as_the_library() {
    let response = memory_app()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            json!({"email": " X@Y.com "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"userId": user_id()}));
}

#[tokio::test]
async fn login_without_email_is_rejected() {
    for body in [json!({}), json!({"email": "   "}), json!({"email": 42})] {
        let response = memory_app()
            .oneshot(json_request("POST", "/auth/login", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_json(response).await,
            json!({"error": "Email is required"})
        );
    }
}

#[tokio::test]
async fn missing_draft_reads_as_null_not_404() {
    let response = memory_app()
        .oneshot(bare_request("GET", &format!("/drafts/{}", user_id())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"draft": null}));
}

#[tokio::test]
async fn put_then_get_round_trips_and_counts_versions() {
    let router = memory_app();
    let uri = format!("/drafts/{}", user_id());

    let first = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({"data": {"answer": "draft one", "agree": false}}),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = response_json(first).await;
    assert_eq!(first_body["saved"]["version"], json!(1));

    let second = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({"data": {"answer": "draft two", "agree": true}}),
        ))
        .await
        .unwrap();
    let second_body = response_json(second).await;
    assert_eq!(second_body["saved"]["version"], json!(2));

    let read = router.oneshot(bare_request("GET", &uri)).await.unwrap();
    let read_body = response_json(read).await;
    assert_eq!(read_body["draft"]["version"], json!(2));
    assert_eq!(read_body["draft"]["data"]["answer"], json!("draft two"));
    assert!(read_body["draft"]["savedAt"].is_string());
}

#[tokio::test]
async fn put_rejects_non_object_data_and_leaves_state_unchanged() {
    let router = memory_app();
    let uri = format!("/drafts/{}", user_id());

    for data in [json!("not-an-object"), json!(7), json!([1]), Value::Null] {
        let response = router
            .clone()
            .oneshot(json_request("PUT", &uri, json!({"data": data})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_json(response).await,
            json!({"error": "data must be an object"})
        );
    }

    // A body with no data field at all gets the same answer.
    let response = router
        .clone()
        .oneshot(json_request("PUT", &uri, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let read = router.oneshot(bare_request("GET", &uri)).await.unwrap();
    assert_eq!(response_json(read).await, json!({"draft": null}));
}

#[tokio::test]
async fn delete_is_idempotent_over_the_wire() {
    let router = memory_app();
    let uri = format!("/drafts/{}", user_id());

    router
        .clone()
        .oneshot(json_request("PUT", &uri, json!({"data": {"answer": "gone soon"}})))
        .await
        .unwrap();

    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(bare_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!({"ok": true}));
    }

    let read = router.oneshot(bare_request("GET", &uri)).await.unwrap();
    assert_eq!(response_json(read).await, json!({"draft": null}));
}

#[tokio::test]
async fn malformed_user_ids_are_bad_requests() {
    let router = memory_app();

    for uri in ["/drafts/abc", "/drafts/ZZZZZZZZZZZZZZZZZZZZZZZZ"] {
        let response = router.clone().oneshot(bare_request("GET", uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_json(response).await,
            json!({"error": "malformed user id"})
        );
    }
}

#[tokio::test]
async fn store_failures_surface_as_server_errors() {
    let store = Arc::new(FlakyStore::new(MemoryDraftStore::new()));
    store.fail_next(1);
    let router = app(store);

    let response = router
        .oneshot(bare_request("GET", &format!("/drafts/{}", user_id())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response_json(response).await,
        json!({"error": "injected failure"})
    );
}

#[tokio::test]
async fn drafts_persist_across_router_instances_with_the_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drafts.json");
    let uri = format!("/drafts/{}", user_id());

    let writer = app(Arc::new(FileDraftStore::new(&path)));
    writer
        .oneshot(json_request("PUT", &uri, json!({"data": {"answer": "durable"}})))
        .await
        .unwrap();

    let reader = app(Arc::new(FileDraftStore::new(&path)));
    let read = reader.oneshot(bare_request("GET", &uri)).await.unwrap();
    let body = response_json(read).await;
    assert_eq!(body["draft"]["data"]["answer"], json!("durable"));
    assert_eq!(body["draft"]["version"], json!(1));
}

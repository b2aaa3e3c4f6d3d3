//! HTTP boundary for SafeFlow draft persistence
//!
//! Three resource-style draft operations keyed by identity (read, upsert,
//! delete), a stateless identity-derivation login, and a health probe.
//! Handlers only translate between the wire and the
//! [`DraftStore`](safeflow_store::DraftStore) contract; failures come back
//! as distinguishable signals (400 for bad requests, 500 for storage
//! trouble) with a JSON `error` body.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use safeflow_store::DraftStore;

/// Maximum accepted request body (1 MiB)
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared router state
#[derive(Clone)]
pub struct AppState {
    /// The draft store all routes operate on
    pub store: Arc<dyn DraftStore>,
}

/// Build the SafeFlow router over a draft store
#[must_use]
pub fn app(store: Arc<dyn DraftStore>) -> Router {
    Router::new()
        .route("/auth/login", post(routes::login))
        .route(
            "/drafts/:user_id",
            get(routes::get_draft)
                .put(routes::put_draft)
                .delete(routes::delete_draft),
        )
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(AppState { store })
}

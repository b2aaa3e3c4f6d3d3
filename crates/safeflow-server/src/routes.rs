//! Route handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use safeflow_identity::UserId;
use safeflow_store::{Draft, DraftData};

use crate::error::ApiError;
use crate::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    user_id: String,
}

#[derive(Serialize)]
pub(crate) struct GetDraftResponse {
    draft: Option<Draft>,
}

#[derive(Serialize)]
pub(crate) struct PutDraftResponse {
    saved: Draft,
}

#[derive(Serialize)]
pub(crate) struct OkResponse {
    ok: bool,
}

/// `POST /auth/login`: derive a stable identity from an email
///
/// Demo-grade: the identity is a truncated digest, not an authenticated
/// credential.
pub(crate) async fn login(Json(body): Json<Value>) -> Result<Json<LoginResponse>, ApiError> {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let user =
        UserId::derive(email).map_err(|_| ApiError::bad_request("Email is required"))?;

    debug!(user = %user, "login");
    Ok(Json(LoginResponse {
        user_id: user.into_string(),
    }))
}

/// `GET /drafts/:user_id`: current draft, or null when none exists
pub(crate) async fn get_draft(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<GetDraftResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    let draft = state.store.get(&user).await?;
    Ok(Json(GetDraftResponse { draft }))
}

/// `PUT /drafts/:user_id`: create or replace the draft
pub(crate) async fn put_draft(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<PutDraftResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    let data = DraftData::try_from(body.get("data").cloned().unwrap_or(Value::Null))?;
    let saved = state.store.put(&user, data).await?;
    Ok(Json(PutDraftResponse { saved }))
}

/// `DELETE /drafts/:user_id`: remove the draft; succeeds even when absent
pub(crate) async fn delete_draft(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<OkResponse>, ApiError> {
    let user = parse_user(&user_id)?;
    state.store.delete(&user).await?;
    Ok(Json(OkResponse { ok: true }))
}

/// `GET /health`
pub(crate) async fn health() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}

fn parse_user(user_id: &str) -> Result<UserId, ApiError> {
    user_id
        .parse()
        .map_err(|_| ApiError::bad_request("malformed user id"))
}

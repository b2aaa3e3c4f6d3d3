//! Remote draft store client
//!
//! Speaks the server's wire protocol (see `safeflow-server`): read, upsert,
//! and delete keyed by identity. Transport failures map to
//! [`StoreError::Unavailable`]; rejected requests carry the server's error
//! message as [`StoreError::InvalidInput`].

use serde::{Deserialize, Serialize};

use crate::draft::{Draft, DraftData};
use crate::error::StoreError;
use crate::store::DraftStore;
use safeflow_identity::UserId;

/// [`DraftStore`] backed by a SafeFlow server over HTTP
#[derive(Debug, Clone)]
pub struct HttpDraftStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct GetDraftResponse {
    draft: Option<Draft>,
}

#[derive(Deserialize)]
struct PutDraftResponse {
    saved: Draft,
}

#[derive(Serialize)]
struct PutDraftRequest<'a> {
    data: &'a DraftData,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpDraftStore {
    /// Create a client for the server at `base_url` (e.g. `http://localhost:3000`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn draft_url(&self, user: &UserId) -> String {
        format!("{}/drafts/{}", self.base_url, user)
    }

    /// Turn a non-success response into the matching [`StoreError`]
    ///
    /// Reads the server's `{"error": ...}` body when present; falls back to
    /// the status code otherwise.
    async fn error_for(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("request failed ({status})"),
        };

        if status == reqwest::StatusCode::BAD_REQUEST {
            StoreError::InvalidInput(message)
        } else {
            StoreError::Unavailable(message)
        }
    }
}

#[async_trait::async_trait]
impl DraftStore for HttpDraftStore {
    async fn get(&self, user: &UserId) -> Result<Option<Draft>, StoreError> {
        let response = self
            .client
            .get(self.draft_url(user))
            .send()
            .await
            .map_err(StoreError::unavailable)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body: GetDraftResponse = response.json().await.map_err(StoreError::unavailable)?;
        Ok(body.draft)
    }

    async fn put(&self, user: &UserId, data: DraftData) -> Result<Draft, StoreError> {
        let response = self
            .client
            .put(self.draft_url(user))
            .json(&PutDraftRequest { data: &data })
            .send()
            .await
            .map_err(StoreError::unavailable)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }

        let body: PutDraftResponse = response.json().await.map_err(StoreError::unavailable)?;
        Ok(body.saved)
    }

    async fn delete(&self, user: &UserId) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.draft_url(user))
            .send()
            .await
            .map_err(StoreError::unavailable)?;

        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(())
    }
}

//! HTTP document store.
//!
//! Writes each profile as `PUT {base_url}/{collection}/{document_id}` with a
//! JSON body and a bearer token.

use std::time::Duration;

use affirm_core::error::{AffirmError, Result};
use affirm_core::sync::{AuthToken, RemoteDocumentStore, RemoteWriteError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

/// Longest response body excerpt kept in a rejection error.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// [`RemoteDocumentStore`] over a REST-style document API.
#[derive(Clone)]
pub struct HttpDocumentStore {
    client: Client,
    base_url: Url,
}

impl HttpDocumentStore {
    /// Creates a store for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AffirmError::config(format!("Invalid remote URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AffirmError::config(format!(
                "Remote URL '{}' cannot be used as a base",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AffirmError::config(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!("[HttpDocumentStore] Initialized with URL: {}", base_url);

        Ok(Self { client, base_url })
    }

    fn document_url(&self, collection: &str, document_id: &str) -> std::result::Result<Url, RemoteWriteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteWriteError::network("remote URL cannot be a base"))?
            .pop_if_empty()
            .push(collection)
            .push(document_id);
        Ok(url)
    }
}

/// Maps a non-success status to the sync layer's error taxonomy.
fn classify_status(status: StatusCode, body: &str) -> RemoteWriteError {
    let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RemoteWriteError::unauthenticated(format!("remote returned {}", status))
        }
        _ => RemoteWriteError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl RemoteDocumentStore for HttpDocumentStore {
    async fn write(
        &self,
        collection: &str,
        document_id: &str,
        payload: &serde_json::Value,
        token: &AuthToken,
    ) -> std::result::Result<(), RemoteWriteError> {
        let url = self.document_url(collection, document_id)?;

        let response = self
            .client
            .put(url)
            .bearer_auth(token.as_str())
            .json(payload)
            .send()
            .await
            .map_err(|e| RemoteWriteError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                "[HttpDocumentStore] Wrote {}/{} ({})",
                collection,
                document_id,
                status
            );
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(classify_status(status, &body))
    }
}

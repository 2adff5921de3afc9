//! Remote document store and authentication contracts.

use async_trait::async_trait;
use thiserror::Error;

/// Why a remote write did not land.
///
/// Never surfaced to callers of the profile store; the sync layer turns
/// every variant into a retry queue entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteWriteError {
    /// Transport-level failure (DNS, connect, timeout, ...)
    #[error("network error: {0}")]
    Network(String),

    /// The remote answered with a non-success status
    #[error("remote rejected write ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// No identity token available, or the remote refused it
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    /// No remote is configured; writes can only be queued
    #[error("remote store is offline")]
    Offline,

    /// The profile could not be encoded as a document
    #[error("failed to encode document: {0}")]
    Serialization(String),
}

impl RemoteWriteError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    /// Check if the failure means the cached identity token is unusable
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }
}

/// Opaque identity token presented to the remote store.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Remote document store holding one document per user.
#[async_trait]
pub trait RemoteDocumentStore: Send + Sync {
    /// Writes `payload` as the full document `collection/document_id`.
    async fn write(
        &self,
        collection: &str,
        document_id: &str,
        payload: &serde_json::Value,
        token: &AuthToken,
    ) -> Result<(), RemoteWriteError>;
}

/// Supplies the identity token required before remote writes.
///
/// Called lazily on the first push, not at startup.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn identity_token(&self) -> Result<AuthToken, RemoteWriteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("secret-value");
        assert_eq!(format!("{:?}", token), "AuthToken(***)");
        assert_eq!(token.as_str(), "secret-value");
    }

    #[test]
    fn test_auth_classification() {
        assert!(RemoteWriteError::unauthenticated("expired").is_auth());
        assert!(!RemoteWriteError::Offline.is_auth());
    }
}

//! Static identity token provider.

use affirm_core::sync::{AuthProvider, AuthToken, RemoteWriteError};
use async_trait::async_trait;

/// Hands out a token fixed at construction (settings file or
/// `AFFIRM_API_TOKEN`).
///
/// With no token the provider reports `Unauthenticated`, which the sync
/// layer treats like any other remote failure.
#[derive(Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<AuthToken>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token
                .filter(|t| !t.trim().is_empty())
                .map(AuthToken::new),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn identity_token(&self) -> Result<AuthToken, RemoteWriteError> {
        self.token
            .clone()
            .ok_or_else(|| RemoteWriteError::unauthenticated("no API token configured"))
    }
}

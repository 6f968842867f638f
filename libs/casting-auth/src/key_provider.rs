use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use std::collections::HashMap;
use thiserror::Error;

use crate::errors::AuthError;

#[derive(Debug, Error)]
pub enum KeyProviderError {
    #[error("unknown key id: {0}")]
    UnknownKeyId(String),

    #[error("key set fetch failed: {0}")]
    FetchFailed(String),
}

impl From<KeyProviderError> for AuthError {
    fn from(err: KeyProviderError) -> Self {
        match err {
            KeyProviderError::UnknownKeyId(kid) => AuthError::KeyNotFound { kid },
            KeyProviderError::FetchFailed(reason) => AuthError::KeySetUnavailable(reason),
        }
    }
}

/// Source of token verification keys, looked up by `kid`.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// Returns the name of this provider (for debugging/logging)
    fn name(&self) -> &str;

    /// Resolve the verification key for `kid`.
    async fn get_key(&self, kid: &str) -> Result<DecodingKey, KeyProviderError>;

    /// Optional: refresh keys if this provider supports it (e.g., JWKS)
    async fn refresh_keys(&self) -> Result<(), KeyProviderError> {
        Ok(())
    }
}

/// Fixed in-memory key set. Used for tests and local development with
/// shared-secret tokens.
#[derive(Default)]
#[must_use]
pub struct StaticKeyProvider {
    keys: HashMap<String, DecodingKey>,
}

impl StaticKeyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, kid: impl Into<String>, key: DecodingKey) -> Self {
        self.keys.insert(kid.into(), key);
        self
    }

    /// Register an HMAC secret under `kid`.
    pub fn with_secret(self, kid: impl Into<String>, secret: &[u8]) -> Self {
        self.with_key(kid, DecodingKey::from_secret(secret))
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn get_key(&self, kid: &str) -> Result<DecodingKey, KeyProviderError> {
        self.keys
            .get(kid)
            .cloned()
            .ok_or_else(|| KeyProviderError::UnknownKeyId(kid.to_owned()))
    }
}

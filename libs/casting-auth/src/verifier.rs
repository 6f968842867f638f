use http::HeaderMap;
use jsonwebtoken::decode_header;
use std::sync::Arc;

use crate::{
    claims::ClaimPayload,
    errors::{AUTHORIZATION_MALFORMED, AuthError},
    header::extract_bearer_token,
    key_provider::KeyProvider,
    validation::{ValidationConfig, decode_claims},
};

/// Turns a bearer credential into a verified [`ClaimPayload`].
///
/// Reads `kid` from the unverified token header, asks the key provider for the
/// matching key, then checks signature, audience, issuer and expiry.
pub struct TokenVerifier {
    key_provider: Arc<dyn KeyProvider>,
    validation: ValidationConfig,
}

impl TokenVerifier {
    #[must_use]
    pub fn new(key_provider: Arc<dyn KeyProvider>, validation: ValidationConfig) -> Self {
        Self {
            key_provider,
            validation,
        }
    }

    /// Verify the bearer token carried by `headers`.
    ///
    /// # Errors
    /// Any header or token failure, see [`extract_bearer_token`] and
    /// [`TokenVerifier::verify_token`].
    pub async fn verify_headers(&self, headers: &HeaderMap) -> Result<ClaimPayload, AuthError> {
        let token = extract_bearer_token(headers)?;
        self.verify_token(token).await
    }

    /// Verify a raw token string.
    ///
    /// # Errors
    /// - [`AuthError::UnparsableToken`] if the header cannot be decoded
    /// - [`AuthError::MalformedHeader`] if the header has no `kid`
    /// - [`AuthError::KeyNotFound`] / [`AuthError::KeySetUnavailable`] from the key provider
    /// - claim validation failures from [`decode_claims`]
    pub async fn verify_token(&self, token: &str) -> Result<ClaimPayload, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "undecodable token header");
            AuthError::UnparsableToken
        })?;

        let kid = header
            .kid
            .as_deref()
            .ok_or(AuthError::MalformedHeader(AUTHORIZATION_MALFORMED))?;

        let key = self.key_provider.get_key(kid).await.map_err(|e| {
            tracing::debug!(
                provider = self.key_provider.name(),
                kid = kid,
                error = %e,
                "verification key lookup failed"
            );
            AuthError::from(e)
        })?;

        let raw = decode_claims(token, &key, &self.validation)?;
        ClaimPayload::from_value(&raw)
    }
}

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde_json::Value;

use crate::errors::AuthError;

/// Claim checks applied to every token after the signature is verified.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Accepted signing algorithms; the first one is the primary.
    pub algorithms: Vec<Algorithm>,

    /// Required `aud` value (any audience accepted when `None`)
    pub audience: Option<String>,

    /// Required `iss` value (any issuer accepted when `None`)
    pub issuer: Option<String>,

    /// Leeway in seconds for `exp` and `nbf`
    pub leeway_seconds: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            algorithms: vec![Algorithm::RS256],
            audience: None,
            issuer: None,
            leeway_seconds: 0,
        }
    }
}

impl ValidationConfig {
    /// Translate into `jsonwebtoken` validation rules.
    ///
    /// # Errors
    /// Returns [`AuthError::Internal`] if no algorithm is configured.
    pub fn to_validation(&self) -> Result<Validation, AuthError> {
        let primary = *self
            .algorithms
            .first()
            .ok_or_else(|| AuthError::Internal("no signing algorithm configured".into()))?;

        let mut validation = Validation::new(primary);
        validation.algorithms.clone_from(&self.algorithms);
        validation.leeway = self.leeway_seconds;
        validation.validate_nbf = true;

        match &self.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        if let Some(iss) = &self.issuer {
            validation.set_issuer(&[iss]);
        }

        Ok(validation)
    }
}

/// Verify the signature and registered claims of `token`, returning its raw body.
///
/// # Errors
/// - [`AuthError::TokenExpired`] if `exp` is in the past
/// - [`AuthError::InvalidClaims`] on audience/issuer mismatch, a missing required
///   claim, or a token that is not valid yet
/// - [`AuthError::UnparsableToken`] on any other decoding or signature failure
pub fn decode_claims(
    token: &str,
    key: &DecodingKey,
    config: &ValidationConfig,
) -> Result<Value, AuthError> {
    let validation = config.to_validation()?;

    decode::<Value>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|e| classify_jwt_error(&e))
}

/// Map a `jsonwebtoken` failure onto the client-facing error kinds.
#[must_use]
pub fn classify_jwt_error(err: &jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::ImmatureSignature => AuthError::InvalidClaims,
        other => {
            tracing::debug!(kind = ?other, "token rejected");
            AuthError::UnparsableToken
        }
    }
}

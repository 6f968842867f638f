use http::StatusCode;
use thiserror::Error;

pub const AUTHORIZATION_MALFORMED: &str = "Authorization malformed.";

/// Failure raised while authenticating or authorizing a request.
///
/// The `Display` text of every variant except [`AuthError::Internal`] is the
/// message sent to the client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,

    #[error("{0}")]
    MalformedHeader(&'static str),

    #[error("Unable to find the appropriate key.")]
    KeyNotFound { kid: String },

    #[error("Unable to find the appropriate key.")]
    KeySetUnavailable(String),

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,

    #[error("Unable to parse authentication token.")]
    UnparsableToken,

    #[error("Permissions not included in JWT.")]
    ClaimsMissingPermissions,

    #[error("Permission not found.")]
    PermissionDenied { permission: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::ClaimsMissingPermissions => StatusCode::BAD_REQUEST,
            AuthError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// Short machine-readable code, used in logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::MalformedHeader(_) | AuthError::UnparsableToken => "invalid_header",
            AuthError::KeyNotFound { .. } | AuthError::KeySetUnavailable(_) => "invalid_key",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::ClaimsMissingPermissions => "invalid_claims",
            AuthError::PermissionDenied { .. } => "unauthorized",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Message exposed to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Internal(_) => {
                casting_errors::response::default_message(StatusCode::INTERNAL_SERVER_ERROR)
                    .to_owned()
            }
            other => other.to_string(),
        }
    }
}

impl From<AuthError> for casting_errors::ErrorResponse {
    fn from(err: AuthError) -> Self {
        casting_errors::ErrorResponse::new(err.status(), err.public_message())
    }
}

#[cfg(feature = "axum-ext")]
impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        casting_errors::ErrorResponse::from(self).into_response()
    }
}

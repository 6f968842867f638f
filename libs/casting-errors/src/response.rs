//! JSON error body (pure data model; axum integration behind the `axum` feature)

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Result alias for handlers that fail with an [`ErrorResponse`].
pub type ApiResult<T> = Result<T, ErrorResponse>;

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// Error body returned for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct ErrorResponse {
    /// Always `false`; mirrors the `success: true` of the success envelopes.
    pub success: bool,
    /// HTTP status code, serialized as an integer under the `error` key.
    #[serde(
        rename = "error",
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    pub status: StatusCode,
    /// Human-readable description. Never carries internal error details.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: message.into(),
        }
    }

    /// Error with the canonical description for `status`.
    pub fn from_status(status: StatusCode) -> Self {
        Self::new(status, default_message(status))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}

/// Canonical human-readable description for the statuses the API emits.
#[must_use]
pub fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "The browser (or proxy) sent a request that this server could not understand.",
        StatusCode::UNAUTHORIZED => "The server could not verify that you are authorized to access the URL requested.",
        StatusCode::FORBIDDEN => "You don't have the permission to access the requested resource.",
        StatusCode::NOT_FOUND => "The requested URL was not found on the server.",
        StatusCode::METHOD_NOT_ALLOWED => "The method is not allowed for the requested URL.",
        StatusCode::CONFLICT => "A conflict happened while processing the request.",
        StatusCode::UNPROCESSABLE_ENTITY => "The request was well-formed but was unable to be followed due to semantic errors.",
        _ => "The server encountered an internal error and was unable to complete your request.",
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ErrorResponse {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        let status = self.status;
        (status, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn serializes_uniform_shape() {
        let err = ErrorResponse::not_found("Actor_id 7 not found.");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], 404);
        assert_eq!(json["message"], "Actor_id 7 not found.");
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn deserializes_status_from_integer() {
        let json = r#"{"success":false,"error":409,"message":"dup"}"#;
        let err: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(!err.success);
    }

    #[test]
    fn from_status_uses_canonical_message() {
        let err = ErrorResponse::from_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.message, "The method is not allowed for the requested URL.");

        let err = ErrorResponse::from_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.is_empty());
    }

    #[cfg(feature = "axum")]
    #[test]
    fn into_response_keeps_status() {
        use axum::response::IntoResponse;

        let response = ErrorResponse::conflict("taken").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}

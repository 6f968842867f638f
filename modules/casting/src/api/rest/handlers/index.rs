use axum::http::StatusCode;
use casting_errors::ErrorResponse;

pub const GREETING: &str = "This is the Casting Agency API";

pub async fn index() -> &'static str {
    GREETING
}

pub async fn not_found() -> ErrorResponse {
    ErrorResponse::from_status(StatusCode::NOT_FOUND)
}

pub async fn method_not_allowed() -> ErrorResponse {
    ErrorResponse::from_status(StatusCode::METHOD_NOT_ALLOWED)
}

//! Request handlers. Each one extracts, calls the service, wraps the result.

mod actors;
mod index;
mod movies;
mod roles;

pub use actors::{create_actor, delete_actor, list_actors, update_actor};
pub use index::{GREETING, index, method_not_allowed, not_found};
pub use movies::{create_movie, delete_movie, list_movies, update_movie};
pub use roles::{add_actor_to_movie, remove_actor_from_movie};

use axum::Json;
use axum::extract::Path;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use casting_errors::ErrorResponse;
use tracing::debug;

use crate::domain::error::DomainError;

pub(crate) const MALFORMED_BODY: &str = "Request body must be a JSON object.";

/// Unreadable bodies become a 400 validation error.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, DomainError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "Rejected request body");
        DomainError::validation("body", MALFORMED_BODY)
    })
}

/// Ids that do not parse cannot name an existing row.
fn path_or_not_found<T>(path: Result<Path<T>, PathRejection>) -> Result<T, ErrorResponse> {
    path.map(|Path(value)| value).map_err(|rejection| {
        debug!(reason = %rejection.body_text(), "Rejected path parameters");
        ErrorResponse::from_status(StatusCode::NOT_FOUND)
    })
}

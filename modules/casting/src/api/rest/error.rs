use casting_errors::ErrorResponse;
use casting_errors::response::default_message;
use axum::http::StatusCode;

use crate::domain::error::DomainError;

/// Map a domain error to the JSON error envelope.
pub fn domain_error_to_response(e: &DomainError) -> ErrorResponse {
    match e {
        DomainError::Validation { .. } => ErrorResponse::bad_request(e.to_string()),
        DomainError::InvalidField { .. } => ErrorResponse::unprocessable(e.to_string()),
        DomainError::ActorNotFound { .. }
        | DomainError::MovieNotFound { .. }
        | DomainError::RoleNotFound { .. } => ErrorResponse::not_found(e.to_string()),
        DomainError::RoleConflict { .. } => ErrorResponse::conflict(e.to_string()),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = %e, "Database error occurred");
            ErrorResponse::unprocessable(default_message(StatusCode::UNPROCESSABLE_ENTITY))
        }
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(e: DomainError) -> Self {
        domain_error_to_response(&e)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (DomainError::missing_field("name"), StatusCode::BAD_REQUEST),
            (
                DomainError::invalid_field("age", "must not be negative"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::actor_not_found(1), StatusCode::NOT_FOUND),
            (DomainError::movie_not_found(1), StatusCode::NOT_FOUND),
            (DomainError::role_not_found(1, 2), StatusCode::NOT_FOUND),
            (DomainError::role_conflict(1, 2), StatusCode::CONFLICT),
        ];

        for (err, status) in cases {
            let resp = ErrorResponse::from(err);
            assert_eq!(resp.status, status);
            assert!(!resp.success);
        }
    }

    #[test]
    #[tracing_test::traced_test]
    fn database_details_are_logged_not_returned() {
        let resp = ErrorResponse::from(DomainError::database("UNIQUE constraint failed: roles"));
        assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!resp.message.contains("roles"));
        assert!(logs_contain("Database error occurred"));
    }

    #[test]
    fn not_found_messages_name_the_resource() {
        assert_eq!(
            ErrorResponse::from(DomainError::actor_not_found(5)).message,
            "Actor_id 5 not found."
        );
        assert_eq!(
            ErrorResponse::from(DomainError::role_not_found(5, 6)).message,
            "actor_id 5 does not have a role in movie_id 6"
        );
    }
}

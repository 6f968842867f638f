use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    /// Required input missing or request body unreadable
    #[error("{message}")]
    Validation { field: String, message: String },

    /// Input present but violating a field constraint
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Actor_id {id} not found.")]
    ActorNotFound { id: i32 },

    #[error("Movie_id {id} not found.")]
    MovieNotFound { id: i32 },

    #[error("actor_id {actor_id} does not have a role in movie_id {movie_id}")]
    RoleNotFound { actor_id: i32, movie_id: i32 },

    #[error("actor_id {actor_id} already has a role in movie_id {movie_id}")]
    RoleConflict { actor_id: i32, movie_id: i32 },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Required attribute absent from a create request.
    pub fn missing_field(field: &str) -> Self {
        Self::validation(field, format!("The {field} attribute must be specified."))
    }

    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn actor_not_found(id: i32) -> Self {
        Self::ActorNotFound { id }
    }

    #[must_use]
    pub fn movie_not_found(id: i32) -> Self {
        Self::MovieNotFound { id }
    }

    #[must_use]
    pub fn role_not_found(actor_id: i32, movie_id: i32) -> Self {
        Self::RoleNotFound { actor_id, movie_id }
    }

    #[must_use]
    pub fn role_conflict(actor_id: i32, movie_id: i32) -> Self {
        Self::RoleConflict { actor_id, movie_id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

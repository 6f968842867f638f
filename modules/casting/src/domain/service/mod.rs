//! Domain service layer - business rules for actors, movies and roles.
//!
//! Per-resource submodules add methods to [`Service`]:
//! - `actors` - actor CRUD and field rules
//! - `movies` - movie CRUD and field rules
//! - `roles` - linking actors to movies (duplicate and missing-link rules)
//!
//! The service never touches HTTP types; the REST layer maps [`DomainError`]
//! to responses.

use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::repos::{ActorsRepository, MoviesRepository, RolesRepository};

mod actors;
mod movies;
mod roles;

/// Entry point for every casting operation.
#[derive(Clone)]
pub struct Service {
    actors: Arc<dyn ActorsRepository>,
    movies: Arc<dyn MoviesRepository>,
    roles: Arc<dyn RolesRepository>,
}

impl Service {
    #[must_use]
    pub fn new(
        actors: Arc<dyn ActorsRepository>,
        movies: Arc<dyn MoviesRepository>,
        roles: Arc<dyn RolesRepository>,
    ) -> Self {
        Self {
            actors,
            movies,
            roles,
        }
    }
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, DomainError> {
    value.ok_or_else(|| DomainError::missing_field(field))
}

fn check_text(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid_field(field, "must not be empty"));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(DomainError::invalid_field(
            field,
            format!("{len} characters (max: {max_len})"),
        ));
    }
    Ok(())
}

fn check_optional_text(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(DomainError::invalid_field(
            field,
            format!("{len} characters (max: {max_len})"),
        ));
    }
    Ok(())
}

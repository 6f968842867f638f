use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::model::{Movie, MoviePatch, MovieWithActors, NewMovie};

/// Persistence operations for movies.
///
/// Deleting a movie also removes every role that references it.
#[async_trait]
pub trait MoviesRepository: Send + Sync {
    /// All movies ordered by id, each with its cast ordered by actor id.
    async fn list(&self) -> Result<Vec<MovieWithActors>, DomainError>;

    async fn get(&self, id: i32) -> Result<Option<Movie>, DomainError>;

    async fn get_with_actors(&self, id: i32) -> Result<Option<MovieWithActors>, DomainError>;

    async fn create(&self, movie: NewMovie) -> Result<Movie, DomainError>;

    /// Apply the supplied fields. Returns `None` if the movie does not exist.
    async fn update(&self, id: i32, patch: MoviePatch) -> Result<Option<Movie>, DomainError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
}

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::model::{Actor, ActorPatch, ActorWithMovies, NewActor};

/// Persistence operations for actors.
///
/// Deleting an actor also removes every role that references it.
#[async_trait]
pub trait ActorsRepository: Send + Sync {
    /// All actors ordered by id, each with their movies ordered by id.
    async fn list(&self) -> Result<Vec<ActorWithMovies>, DomainError>;

    async fn get(&self, id: i32) -> Result<Option<Actor>, DomainError>;

    async fn get_with_movies(&self, id: i32) -> Result<Option<ActorWithMovies>, DomainError>;

    async fn create(&self, actor: NewActor) -> Result<Actor, DomainError>;

    /// Apply the supplied fields. Returns `None` if the actor does not exist.
    async fn update(&self, id: i32, patch: ActorPatch) -> Result<Option<Actor>, DomainError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
}

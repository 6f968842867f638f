use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::model::Role;

#[async_trait]
pub trait RolesRepository: Send + Sync {
    /// All roles ordered by `(actor_id, movie_id)`.
    async fn list(&self) -> Result<Vec<Role>, DomainError>;

    async fn find(&self, actor_id: i32, movie_id: i32) -> Result<Option<Role>, DomainError>;

    /// Insert the link. An existing pair fails with [`DomainError::RoleConflict`].
    async fn create(&self, role: Role) -> Result<Role, DomainError>;

    /// Returns `false` if the pair was not linked.
    async fn delete(&self, role: Role) -> Result<bool, DomainError>;
}

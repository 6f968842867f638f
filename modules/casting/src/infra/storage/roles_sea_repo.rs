use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::error::DomainError;
use crate::domain::model::Role;
use crate::domain::repos::RolesRepository;
use crate::infra::storage::db::{db_err, is_unique_violation};
use crate::infra::storage::entity::role::{self, ActiveModel as RoleAM, Entity as RoleEntity};

/// ORM-based implementation of the `RolesRepository` trait.
#[derive(Clone)]
pub struct OrmRolesRepository {
    db: DatabaseConnection,
}

impl OrmRolesRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RolesRepository for OrmRolesRepository {
    async fn list(&self) -> Result<Vec<Role>, DomainError> {
        let rows = RoleEntity::find()
            .order_by_asc(role::Column::ActorId)
            .order_by_asc(role::Column::MovieId)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find(&self, actor_id: i32, movie_id: i32) -> Result<Option<Role>, DomainError> {
        let found = RoleEntity::find_by_id((actor_id, movie_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn create(&self, role: Role) -> Result<Role, DomainError> {
        let m = RoleAM {
            actor_id: Set(role.actor_id),
            movie_id: Set(role.movie_id),
        };

        // Composite key without auto-increment: nothing to read back
        match RoleEntity::insert(m).exec_without_returning(&self.db).await {
            Ok(_) => Ok(role),
            Err(e) if is_unique_violation(&e) => {
                Err(DomainError::role_conflict(role.actor_id, role.movie_id))
            }
            Err(e) => Err(db_err(e)),
        }
    }

    async fn delete(&self, role: Role) -> Result<bool, DomainError> {
        let res = RoleEntity::delete_by_id((role.actor_id, role.movie_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }
}

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, LoaderTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::error::DomainError;
use crate::domain::model::{Actor, ActorPatch, ActorWithMovies, Movie, NewActor};
use crate::domain::repos::ActorsRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::actor::{self, ActiveModel as ActorAM, Entity as ActorEntity};
use crate::infra::storage::entity::{movie, role};

/// ORM-based implementation of the `ActorsRepository` trait.
#[derive(Clone)]
pub struct OrmActorsRepository {
    db: DatabaseConnection,
}

impl OrmActorsRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sorted_movies(models: Vec<movie::Model>) -> Vec<Movie> {
    let mut movies: Vec<Movie> = models.into_iter().map(Into::into).collect();
    movies.sort_by_key(|m| m.id);
    movies
}

#[async_trait]
impl ActorsRepository for OrmActorsRepository {
    async fn list(&self) -> Result<Vec<ActorWithMovies>, DomainError> {
        let actors = ActorEntity::find()
            .order_by_asc(actor::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let movies = actors
            .load_many_to_many(movie::Entity, role::Entity, &self.db)
            .await
            .map_err(db_err)?;

        Ok(actors
            .into_iter()
            .zip(movies)
            .map(|(a, m)| ActorWithMovies {
                actor: a.into(),
                movies: sorted_movies(m),
            })
            .collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Actor>, DomainError> {
        let found = ActorEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn get_with_movies(&self, id: i32) -> Result<Option<ActorWithMovies>, DomainError> {
        let Some(found) = ActorEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let movies = found
            .find_related(movie::Entity)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(Some(ActorWithMovies {
            actor: found.into(),
            movies: sorted_movies(movies),
        }))
    }

    async fn create(&self, actor: NewActor) -> Result<Actor, DomainError> {
        let m = ActorAM {
            name: Set(actor.name),
            age: Set(Some(actor.age)),
            gender: Set(Some(actor.gender)),
            ..Default::default()
        };

        let inserted = m.insert(&self.db).await.map_err(db_err)?;
        Ok(inserted.into())
    }

    async fn update(&self, id: i32, patch: ActorPatch) -> Result<Option<Actor>, DomainError> {
        let Some(found) = ActorEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut m = found.into_active_model();
        if let Some(name) = patch.name {
            m.name = Set(name);
        }
        if let Some(age) = patch.age {
            m.age = Set(Some(age));
        }
        if let Some(gender) = patch.gender {
            m.gender = Set(Some(gender));
        }

        let updated = m.update(&self.db).await.map_err(db_err)?;
        Ok(Some(updated.into()))
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        role::Entity::delete_many()
            .filter(role::Column::ActorId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let res = ActorEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }
}

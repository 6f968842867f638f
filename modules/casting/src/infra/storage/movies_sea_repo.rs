use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, LoaderTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::error::DomainError;
use crate::domain::model::{Actor, Movie, MoviePatch, MovieWithActors, NewMovie};
use crate::domain::repos::MoviesRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::movie::{self, ActiveModel as MovieAM, Entity as MovieEntity};
use crate::infra::storage::entity::{actor, role};

/// ORM-based implementation of the `MoviesRepository` trait.
#[derive(Clone)]
pub struct OrmMoviesRepository {
    db: DatabaseConnection,
}

impl OrmMoviesRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sorted_cast(models: Vec<actor::Model>) -> Vec<Actor> {
    let mut actors: Vec<Actor> = models.into_iter().map(Into::into).collect();
    actors.sort_by_key(|a| a.id);
    actors
}

#[async_trait]
impl MoviesRepository for OrmMoviesRepository {
    async fn list(&self) -> Result<Vec<MovieWithActors>, DomainError> {
        let movies = MovieEntity::find()
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let casts = movies
            .load_many_to_many(actor::Entity, role::Entity, &self.db)
            .await
            .map_err(db_err)?;

        Ok(movies
            .into_iter()
            .zip(casts)
            .map(|(m, cast)| MovieWithActors {
                movie: m.into(),
                actors: sorted_cast(cast),
            })
            .collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Movie>, DomainError> {
        let found = MovieEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn get_with_actors(&self, id: i32) -> Result<Option<MovieWithActors>, DomainError> {
        let Some(found) = MovieEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let cast = found
            .find_related(actor::Entity)
            .order_by_asc(actor::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(Some(MovieWithActors {
            movie: found.into(),
            actors: sorted_cast(cast),
        }))
    }

    async fn create(&self, movie: NewMovie) -> Result<Movie, DomainError> {
        let m = MovieAM {
            title: Set(movie.title),
            release_year: Set(movie.release_year),
            genre: Set(Some(movie.genre)),
            ..Default::default()
        };

        let inserted = m.insert(&self.db).await.map_err(db_err)?;
        Ok(inserted.into())
    }

    async fn update(&self, id: i32, patch: MoviePatch) -> Result<Option<Movie>, DomainError> {
        let Some(found) = MovieEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut m = found.into_active_model();
        if let Some(title) = patch.title {
            m.title = Set(title);
        }
        if let Some(release_year) = patch.release_year {
            m.release_year = Set(release_year);
        }
        if let Some(genre) = patch.genre {
            m.genre = Set(Some(genre));
        }

        let updated = m.update(&self.db).await.map_err(db_err)?;
        Ok(Some(updated.into()))
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        role::Entity::delete_many()
            .filter(role::Column::MovieId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let res = MovieEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(res.rows_affected > 0)
    }
}

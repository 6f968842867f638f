use tracing::{debug, info, instrument};

use super::Service;
use crate::domain::error::DomainError;
use crate::domain::fields::RoleFields;
use crate::domain::model::{MovieWithActors, Role};

impl Service {
    /// Give `actor_id` a role in `movie_id` and return the movie with its cast.
    ///
    /// Checks run in order: `actor_id` present (and non-zero), movie exists,
    /// actor exists, pair not linked yet.
    #[instrument(skip(self))]
    pub async fn add_actor_to_movie(
        &self,
        movie_id: i32,
        actor_id: Option<i32>,
    ) -> Result<MovieWithActors, DomainError> {
        let Some(actor_id) = actor_id.filter(|id| *id != 0) else {
            return Err(DomainError::missing_field(RoleFields::ACTOR_ID));
        };

        if self.movies.get(movie_id).await?.is_none() {
            return Err(DomainError::movie_not_found(movie_id));
        }
        if self.actors.get(actor_id).await?.is_none() {
            return Err(DomainError::actor_not_found(actor_id));
        }
        if self.roles.find(actor_id, movie_id).await?.is_some() {
            debug!("Role already exists");
            return Err(DomainError::role_conflict(actor_id, movie_id));
        }

        self.roles.create(Role { actor_id, movie_id }).await?;
        info!(actor_id, movie_id, "Added actor to movie");

        self.movies
            .get_with_actors(movie_id)
            .await?
            .ok_or_else(|| DomainError::movie_not_found(movie_id))
    }

    /// Remove the role linking `actor_id` to `movie_id`.
    #[instrument(skip(self))]
    pub async fn remove_actor_from_movie(
        &self,
        movie_id: i32,
        actor_id: i32,
    ) -> Result<Role, DomainError> {
        if self.movies.get(movie_id).await?.is_none() {
            return Err(DomainError::movie_not_found(movie_id));
        }
        if self.actors.get(actor_id).await?.is_none() {
            return Err(DomainError::actor_not_found(actor_id));
        }

        let role = self
            .roles
            .find(actor_id, movie_id)
            .await?
            .ok_or_else(|| DomainError::role_not_found(actor_id, movie_id))?;

        if !self.roles.delete(role).await? {
            return Err(DomainError::role_not_found(actor_id, movie_id));
        }

        info!(actor_id, movie_id, "Removed actor from movie");
        Ok(role)
    }
}

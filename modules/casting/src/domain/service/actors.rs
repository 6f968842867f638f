use tracing::{debug, info, instrument};

use super::{Service, check_optional_text, check_text, require};
use crate::domain::error::DomainError;
use crate::domain::fields::ActorFields;
use crate::domain::model::{ActorPatch, ActorWithMovies, NewActor};

fn check_age(age: i32) -> Result<(), DomainError> {
    if age < 0 {
        return Err(DomainError::invalid_field(
            ActorFields::AGE,
            "must not be negative",
        ));
    }
    Ok(())
}

fn validate_new_actor(actor: &NewActor) -> Result<(), DomainError> {
    check_text(ActorFields::NAME, &actor.name, ActorFields::NAME_MAX_LEN)?;
    check_age(actor.age)?;
    check_optional_text(ActorFields::GENDER, &actor.gender, ActorFields::GENDER_MAX_LEN)
}

fn validate_actor_patch(patch: &ActorPatch) -> Result<(), DomainError> {
    if let Some(name) = &patch.name {
        check_text(ActorFields::NAME, name, ActorFields::NAME_MAX_LEN)?;
    }
    if let Some(age) = patch.age {
        check_age(age)?;
    }
    if let Some(gender) = &patch.gender {
        check_optional_text(ActorFields::GENDER, gender, ActorFields::GENDER_MAX_LEN)?;
    }
    Ok(())
}

impl Service {
    #[instrument(skip(self))]
    pub async fn list_actors(&self) -> Result<Vec<ActorWithMovies>, DomainError> {
        let actors = self.actors.list().await?;
        debug!(count = actors.len(), "Listed actors");
        Ok(actors)
    }

    /// Create an actor. `name`, `age` and `gender` are all required.
    #[instrument(skip(self, fields))]
    pub async fn create_actor(&self, fields: ActorPatch) -> Result<ActorWithMovies, DomainError> {
        let ActorPatch { name, age, gender } = fields;
        let new_actor = NewActor {
            name: require(name, ActorFields::NAME)?,
            age: require(age, ActorFields::AGE)?,
            gender: require(gender, ActorFields::GENDER)?,
        };

        validate_new_actor(&new_actor)?;

        let actor = self.actors.create(new_actor).await?;
        info!(actor_id = actor.id, "Created actor");

        Ok(ActorWithMovies {
            actor,
            movies: Vec::new(),
        })
    }

    /// Apply a partial update.
    ///
    /// The target is resolved before `patch` is looked at, so an unknown id is
    /// reported as not found even when the body is unusable.
    #[instrument(skip(self, patch))]
    pub async fn update_actor(
        &self,
        id: i32,
        patch: Result<ActorPatch, DomainError>,
    ) -> Result<ActorWithMovies, DomainError> {
        if self.actors.get(id).await?.is_none() {
            return Err(DomainError::actor_not_found(id));
        }

        let patch = patch?;
        validate_actor_patch(&patch)?;

        if patch.is_empty() {
            debug!("Empty actor patch, nothing to update");
        } else if self.actors.update(id, patch).await?.is_none() {
            return Err(DomainError::actor_not_found(id));
        }

        let updated = self
            .actors
            .get_with_movies(id)
            .await?
            .ok_or_else(|| DomainError::actor_not_found(id))?;

        info!(actor_id = id, "Updated actor");
        Ok(updated)
    }

    /// Delete an actor and every role referencing it. Returns the deleted id.
    #[instrument(skip(self))]
    pub async fn delete_actor(&self, id: i32) -> Result<i32, DomainError> {
        if self.actors.get(id).await?.is_none() {
            return Err(DomainError::actor_not_found(id));
        }

        if !self.actors.delete(id).await? {
            return Err(DomainError::actor_not_found(id));
        }

        info!(actor_id = id, "Deleted actor");
        Ok(id)
    }
}

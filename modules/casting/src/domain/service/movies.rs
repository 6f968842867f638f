use tracing::{debug, info, instrument};

use super::{Service, check_optional_text, check_text, require};
use crate::domain::error::DomainError;
use crate::domain::fields::MovieFields;
use crate::domain::model::{MoviePatch, MovieWithActors, NewMovie};

fn check_release_year(year: &str) -> Result<(), DomainError> {
    if year.chars().count() != MovieFields::RELEASE_YEAR_LEN {
        return Err(DomainError::invalid_field(
            MovieFields::RELEASE_YEAR,
            format!(
                "must be exactly {} characters",
                MovieFields::RELEASE_YEAR_LEN
            ),
        ));
    }
    Ok(())
}

fn validate_new_movie(movie: &NewMovie) -> Result<(), DomainError> {
    check_text(MovieFields::TITLE, &movie.title, MovieFields::TITLE_MAX_LEN)?;
    check_release_year(&movie.release_year)?;
    check_optional_text(MovieFields::GENRE, &movie.genre, MovieFields::GENRE_MAX_LEN)
}

fn validate_movie_patch(patch: &MoviePatch) -> Result<(), DomainError> {
    if let Some(title) = &patch.title {
        check_text(MovieFields::TITLE, title, MovieFields::TITLE_MAX_LEN)?;
    }
    if let Some(year) = &patch.release_year {
        check_release_year(year)?;
    }
    if let Some(genre) = &patch.genre {
        check_optional_text(MovieFields::GENRE, genre, MovieFields::GENRE_MAX_LEN)?;
    }
    Ok(())
}

impl Service {
    #[instrument(skip(self))]
    pub async fn list_movies(&self) -> Result<Vec<MovieWithActors>, DomainError> {
        let movies = self.movies.list().await?;
        debug!(count = movies.len(), "Listed movies");
        Ok(movies)
    }

    /// Create a movie. `title`, `release_year` and `genre` are all required.
    #[instrument(skip(self, fields))]
    pub async fn create_movie(&self, fields: MoviePatch) -> Result<MovieWithActors, DomainError> {
        let MoviePatch {
            title,
            release_year,
            genre,
        } = fields;
        let new_movie = NewMovie {
            title: require(title, MovieFields::TITLE)?,
            release_year: require(release_year, MovieFields::RELEASE_YEAR)?,
            genre: require(genre, MovieFields::GENRE)?,
        };

        validate_new_movie(&new_movie)?;

        let movie = self.movies.create(new_movie).await?;
        info!(movie_id = movie.id, "Created movie");

        Ok(MovieWithActors {
            movie,
            actors: Vec::new(),
        })
    }

    /// Apply a partial update. Unknown ids win over an unusable body.
    #[instrument(skip(self, patch))]
    pub async fn update_movie(
        &self,
        id: i32,
        patch: Result<MoviePatch, DomainError>,
    ) -> Result<MovieWithActors, DomainError> {
        if self.movies.get(id).await?.is_none() {
            return Err(DomainError::movie_not_found(id));
        }

        let patch = patch?;
        validate_movie_patch(&patch)?;

        if patch.is_empty() {
            debug!("Empty movie patch, nothing to update");
        } else if self.movies.update(id, patch).await?.is_none() {
            return Err(DomainError::movie_not_found(id));
        }

        let updated = self
            .movies
            .get_with_actors(id)
            .await?
            .ok_or_else(|| DomainError::movie_not_found(id))?;

        info!(movie_id = id, "Updated movie");
        Ok(updated)
    }

    /// Delete a movie and its roles. Returns the deleted id.
    #[instrument(skip(self))]
    pub async fn delete_movie(&self, id: i32) -> Result<i32, DomainError> {
        if self.movies.get(id).await?.is_none() {
            return Err(DomainError::movie_not_found(id));
        }

        if !self.movies.delete(id).await? {
            return Err(DomainError::movie_not_found(id));
        }

        info!(movie_id = id, "Deleted movie");
        Ok(id)
    }
}

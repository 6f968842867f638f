//! Value types for actors, movies and roles.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: i32,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub release_year: String,
    pub genre: Option<String>,
}

/// An actor has a part in a movie. Identified by the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Role {
    pub actor_id: i32,
    pub movie_id: i32,
}

/// Actor together with the movies they play in, ordered by movie id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorWithMovies {
    pub actor: Actor,
    pub movies: Vec<Movie>,
}

/// Movie together with its cast, ordered by actor id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieWithActors {
    pub movie: Movie,
    pub actors: Vec<Actor>,
}

/// Validated input for creating an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

/// Partial actor update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl ActorPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.gender.is_none()
    }
}

/// Validated input for creating a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub release_year: String,
    pub genre: String,
}

/// Partial movie update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub release_year: Option<String>,
    pub genre: Option<String>,
}

impl MoviePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.release_year.is_none() && self.genre.is_none()
    }
}

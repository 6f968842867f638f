//! Request bodies and response envelopes.
//!
//! Request fields are all optional so that "missing" can be told apart from
//! "malformed": the service decides which fields are required.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::model::{
    Actor, ActorPatch, ActorWithMovies, Movie, MoviePatch, MovieWithActors, Role,
};

/// Body of `POST /actors` and `PATCH /actors/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorReq {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl From<ActorReq> for ActorPatch {
    fn from(req: ActorReq) -> Self {
        Self {
            name: req.name,
            age: req.age,
            gender: req.gender,
        }
    }
}

/// Body of `POST /movies` and `PATCH /movies/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieReq {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "year_as_text")]
    pub release_year: Option<String>,
    pub genre: Option<String>,
}

impl From<MovieReq> for MoviePatch {
    fn from(req: MovieReq) -> Self {
        Self {
            title: req.title,
            release_year: req.release_year,
            genre: req.genre,
        }
    }
}

/// Accepts `"2016"` as well as `2016`.
fn year_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Year>::deserialize(deserializer)?.map(|y| match y {
        Year::Text(s) => s,
        Year::Number(n) => n.to_string(),
    }))
}

/// Body of `POST /movies/{id}/actors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleReq {
    pub actor_id: Option<i32>,
}

/// Movie as embedded in an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorMovieDto {
    pub title: String,
    pub release_year: String,
    pub genre: Option<String>,
}

impl From<Movie> for ActorMovieDto {
    fn from(m: Movie) -> Self {
        Self {
            title: m.title,
            release_year: m.release_year,
            genre: m.genre,
        }
    }
}

/// Actor as embedded in a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieActorDto {
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl From<Actor> for MovieActorDto {
    fn from(a: Actor) -> Self {
        Self {
            name: a.name,
            age: a.age,
            gender: a.gender,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorDto {
    pub id: i32,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub movies: Vec<ActorMovieDto>,
}

impl From<ActorWithMovies> for ActorDto {
    fn from(ActorWithMovies { actor, movies }: ActorWithMovies) -> Self {
        Self {
            id: actor.id,
            name: actor.name,
            age: actor.age,
            gender: actor.gender,
            movies: movies.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: i32,
    pub title: String,
    pub release_year: String,
    pub genre: Option<String>,
    pub actors: Vec<MovieActorDto>,
}

impl From<MovieWithActors> for MovieDto {
    fn from(MovieWithActors { movie, actors }: MovieWithActors) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            release_year: movie.release_year,
            genre: movie.genre,
            actors: actors.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorsListResponse {
    pub success: bool,
    pub actors: Vec<ActorDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorResponse {
    pub success: bool,
    pub actor: ActorDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorDeletedResponse {
    pub success: bool,
    pub actor_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviesListResponse {
    pub success: bool,
    pub movies: Vec<MovieDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: MovieDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDeletedResponse {
    pub success: bool,
    pub movie_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDeletedResponse {
    pub success: bool,
    pub movie_id: i32,
    pub actor_id: i32,
}

impl From<Role> for RoleDeletedResponse {
    fn from(role: Role) -> Self {
        Self {
            success: true,
            movie_id: role.movie_id,
            actor_id: role.actor_id,
        }
    }
}

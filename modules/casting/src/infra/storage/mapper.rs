//! Conversions between SeaORM models and domain types.

use crate::domain::model::{Actor, Movie, Role};
use crate::infra::storage::entity::{actor, movie, role};

impl From<actor::Model> for Actor {
    fn from(m: actor::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            age: m.age,
            gender: m.gender,
        }
    }
}

impl From<movie::Model> for Movie {
    fn from(m: movie::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            release_year: m.release_year,
            genre: m.genre,
        }
    }
}

impl From<role::Model> for Role {
    fn from(m: role::Model) -> Self {
        Self {
            actor_id: m.actor_id,
            movie_id: m.movie_id,
        }
    }
}

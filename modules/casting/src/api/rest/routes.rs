//! REST route table.
//!
//! Every resource route is wrapped by [`AuthGuard::protect`] with the
//! permission it needs; the greeting at `/` is public. Unknown paths and
//! unsupported methods answer with the JSON error envelope.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use casting_auth::axum_ext::AuthGuard;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Permission strings carried in the token's `permissions` claim.
pub struct Permissions;

impl Permissions {
    pub const GET_ACTORS: &'static str = "get:actors";
    pub const POST_ACTORS: &'static str = "post:actors";
    pub const PATCH_ACTORS: &'static str = "patch:actors";
    pub const DELETE_ACTORS: &'static str = "delete:actors";
    pub const GET_MOVIES: &'static str = "get:movies";
    pub const POST_MOVIES: &'static str = "post:movies";
    pub const PATCH_MOVIES: &'static str = "patch:movies";
    pub const DELETE_MOVIES: &'static str = "delete:movies";
}

/// Build the API router over `service`, guarding each route with `guard`.
pub fn router(service: Arc<Service>, guard: &AuthGuard) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/actors",
            guard
                .protect(Permissions::GET_ACTORS, get(handlers::list_actors))
                .merge(guard.protect(Permissions::POST_ACTORS, post(handlers::create_actor))),
        )
        .route(
            "/actors/{id}",
            guard
                .protect(Permissions::PATCH_ACTORS, patch(handlers::update_actor))
                .merge(guard.protect(Permissions::DELETE_ACTORS, delete(handlers::delete_actor))),
        )
        .route(
            "/movies",
            guard
                .protect(Permissions::GET_MOVIES, get(handlers::list_movies))
                .merge(guard.protect(Permissions::POST_MOVIES, post(handlers::create_movie))),
        )
        .route(
            "/movies/{id}",
            guard
                .protect(Permissions::PATCH_MOVIES, patch(handlers::update_movie))
                .merge(guard.protect(Permissions::DELETE_MOVIES, delete(handlers::delete_movie))),
        )
        .route(
            "/movies/{id}/actors",
            guard.protect(Permissions::POST_MOVIES, post(handlers::add_actor_to_movie)),
        )
        .route(
            "/movies/{id}/actors/{actor_id}",
            guard.protect(
                Permissions::DELETE_MOVIES,
                delete(handlers::remove_actor_from_movie),
            ),
        )
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(service)
}

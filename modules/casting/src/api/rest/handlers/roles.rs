use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use casting_auth::axum_ext::AuthClaims;
use casting_errors::ApiResult;
use tracing::info;

use super::{json_body, path_or_not_found};
use crate::api::rest::dto::{MovieResponse, RoleDeletedResponse, RoleReq};
use crate::domain::service::Service;

/// `POST /movies/{id}/actors`
pub async fn add_actor_to_movie(
    State(svc): State<Arc<Service>>,
    AuthClaims(claims): AuthClaims,
    movie_id: Result<Path<i32>, PathRejection>,
    body: Result<Json<RoleReq>, JsonRejection>,
) -> ApiResult<Json<MovieResponse>> {
    let movie_id = path_or_not_found(movie_id)?;
    let req = json_body(body)?;
    info!(movie_id, actor_id = ?req.actor_id, subject = ?claims.subject, "Adding actor to movie");

    let movie = svc.add_actor_to_movie(movie_id, req.actor_id).await?;
    Ok(Json(MovieResponse {
        success: true,
        movie: movie.into(),
    }))
}

/// `DELETE /movies/{id}/actors/{actor_id}`
pub async fn remove_actor_from_movie(
    State(svc): State<Arc<Service>>,
    AuthClaims(claims): AuthClaims,
    ids: Result<Path<(i32, i32)>, PathRejection>,
) -> ApiResult<Json<RoleDeletedResponse>> {
    let (movie_id, actor_id) = path_or_not_found(ids)?;
    info!(movie_id, actor_id, subject = ?claims.subject, "Removing actor from movie");

    let role = svc.remove_actor_from_movie(movie_id, actor_id).await?;
    Ok(Json(role.into()))
}

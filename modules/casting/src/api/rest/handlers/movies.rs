use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use casting_auth::axum_ext::AuthClaims;
use casting_errors::ApiResult;
use tracing::info;

use super::{json_body, path_or_not_found};
use crate::api::rest::dto::{
    MovieDeletedResponse, MovieReq, MovieResponse, MoviesListResponse,
};
use crate::domain::service::Service;

pub async fn list_movies(State(svc): State<Arc<Service>>) -> ApiResult<Json<MoviesListResponse>> {
    let movies = svc.list_movies().await?;
    Ok(Json(MoviesListResponse {
        success: true,
        movies: movies.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_movie(
    State(svc): State<Arc<Service>>,
    AuthClaims(claims): AuthClaims,
    body: Result<Json<MovieReq>, JsonRejection>,
) -> ApiResult<Json<MovieResponse>> {
    info!(subject = ?claims.subject, "Creating movie");

    let req = json_body(body)?;
    let movie = svc.create_movie(req.into()).await?;
    Ok(Json(MovieResponse {
        success: true,
        movie: movie.into(),
    }))
}

pub async fn update_movie(
    State(svc): State<Arc<Service>>,
    AuthClaims(claims): AuthClaims,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<MovieReq>, JsonRejection>,
) -> ApiResult<Json<MovieResponse>> {
    let id = path_or_not_found(id)?;
    info!(movie_id = id, subject = ?claims.subject, "Updating movie");

    let patch = json_body(body).map(Into::into);
    let movie = svc.update_movie(id, patch).await?;
    Ok(Json(MovieResponse {
        success: true,
        movie: movie.into(),
    }))
}

pub async fn delete_movie(
    State(svc): State<Arc<Service>>,
    AuthClaims(claims): AuthClaims,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<MovieDeletedResponse>> {
    let id = path_or_not_found(id)?;
    info!(movie_id = id, subject = ?claims.subject, "Deleting movie");

    let movie_id = svc.delete_movie(id).await?;
    Ok(Json(MovieDeletedResponse {
        success: true,
        movie_id,
    }))
}

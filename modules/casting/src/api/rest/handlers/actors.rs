use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use casting_auth::axum_ext::AuthClaims;
use casting_errors::ApiResult;
use tracing::info;

use super::{json_body, path_or_not_found};
use crate::api::rest::dto::{
    ActorDeletedResponse, ActorReq, ActorResponse, ActorsListResponse,
};
use crate::domain::service::Service;

pub async fn list_actors(State(svc): State<Arc<Service>>) -> ApiResult<Json<ActorsListResponse>> {
    let actors = svc.list_actors().await?;
    Ok(Json(ActorsListResponse {
        success: true,
        actors: actors.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_actor(
    State(svc): State<Arc<Service>>,
    AuthClaims(claims): AuthClaims,
    body: Result<Json<ActorReq>, JsonRejection>,
) -> ApiResult<Json<ActorResponse>> {
    info!(subject = ?claims.subject, "Creating actor");

    let req = json_body(body)?;
    let actor = svc.create_actor(req.into()).await?;
    Ok(Json(ActorResponse {
        success: true,
        actor: actor.into(),
    }))
}

pub async fn update_actor(
    State(svc): State<Arc<Service>>,
    AuthClaims(claims): AuthClaims,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<ActorReq>, JsonRejection>,
) -> ApiResult<Json<ActorResponse>> {
    let id = path_or_not_found(id)?;
    info!(actor_id = id, subject = ?claims.subject, "Updating actor");

    let patch = json_body(body).map(Into::into);
    let actor = svc.update_actor(id, patch).await?;
    Ok(Json(ActorResponse {
        success: true,
        actor: actor.into(),
    }))
}

pub async fn delete_actor(
    State(svc): State<Arc<Service>>,
    AuthClaims(claims): AuthClaims,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<ActorDeletedResponse>> {
    let id = path_or_not_found(id)?;
    info!(actor_id = id, subject = ?claims.subject, "Deleting actor");

    let actor_id = svc.delete_actor(id).await?;
    Ok(Json(ActorDeletedResponse {
        success: true,
        actor_id,
    }))
}

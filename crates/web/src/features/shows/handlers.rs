use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::show::{CreateShowRequest, UpdateShowRequest},
    models::{CompetitionClass, Show},
    services::local_now,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::ApiJson;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/shows",
    responses(
        (status = 200, description = "List all shows successfully", body = Vec<Show>)
    ),
    tag = "shows"
)]
pub async fn list_shows(State(state): State<AppState>) -> Result<Json<Vec<Show>>, WebError> {
    let shows = services::list_shows(state.store()).await?;

    Ok(Json(shows))
}

#[utoipa::path(
    get,
    path = "/api/shows/{show_id}",
    params(
        ("show_id" = Uuid, Path, description = "Show id")
    ),
    responses(
        (status = 200, description = "Show found", body = Show),
        (status = 404, description = "Show not found")
    ),
    tag = "shows"
)]
pub async fn get_show(
    State(state): State<AppState>,
    Path(show_id): Path<Uuid>,
) -> Result<Json<Show>, WebError> {
    let show = services::get_show(state.store(), show_id).await?;

    Ok(Json(show))
}

#[utoipa::path(
    get,
    path = "/api/shows/{show_id}/classes",
    params(
        ("show_id" = Uuid, Path, description = "Show id")
    ),
    responses(
        (status = 200, description = "Classes of the show in schedule order", body = Vec<CompetitionClass>),
        (status = 404, description = "Show not found")
    ),
    tag = "shows"
)]
pub async fn list_show_classes(
    State(state): State<AppState>,
    Path(show_id): Path<Uuid>,
) -> Result<Json<Vec<CompetitionClass>>, WebError> {
    let classes = services::list_show_classes(state.store(), show_id).await?;

    Ok(Json(classes))
}

#[utoipa::path(
    post,
    path = "/api/shows",
    request_body = CreateShowRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Show created successfully", body = Show),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "shows"
)]
pub async fn create_show(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateShowRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    req.validate_dates()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let show = services::create_show(state.store(), &req, local_now()).await?;

    Ok((StatusCode::CREATED, Json(show)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/shows/{show_id}",
    params(
        ("show_id" = Uuid, Path, description = "Show id")
    ),
    request_body = UpdateShowRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Show updated successfully", body = Show),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Show not found")
    ),
    tag = "shows"
)]
pub async fn update_show(
    State(state): State<AppState>,
    Path(show_id): Path<Uuid>,
    ApiJson(update_req): ApiJson<UpdateShowRequest>,
) -> Result<Json<Show>, WebError> {
    update_req.validate()?;

    let updated = services::update_show(state.store(), show_id, &update_req, local_now()).await?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/shows/{show_id}",
    params(
        ("show_id" = Uuid, Path, description = "Show id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Show deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Show not found"),
        (status = 409, description = "Show still has classes")
    ),
    tag = "shows"
)]
pub async fn delete_show(
    State(state): State<AppState>,
    Path(show_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_show(state.store(), show_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

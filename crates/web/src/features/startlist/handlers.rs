use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::startlist::{CreateStartlistEntryRequest, UpdateStartlistEntryRequest},
    models::StartlistEntry,
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
    path = "/api/classes/{class_id}/startlist",
    params(
        ("class_id" = Uuid, Path, description = "Class id")
    ),
    responses(
        (status = 200, description = "Start list in running order", body = Vec<StartlistEntry>),
        (status = 404, description = "Class not found")
    ),
    tag = "startlist"
)]
pub async fn list_entries(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
) -> Result<Json<Vec<StartlistEntry>>, WebError> {
    let entries = services::list_entries(state.store(), class_id).await?;

    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/startlist/{startlist_id}",
    params(
        ("startlist_id" = Uuid, Path, description = "Start list entry id")
    ),
    responses(
        (status = 200, description = "Entry found", body = StartlistEntry),
        (status = 404, description = "Entry not found")
    ),
    tag = "startlist"
)]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(startlist_id): Path<Uuid>,
) -> Result<Json<StartlistEntry>, WebError> {
    let entry = services::get_entry(state.store(), startlist_id).await?;

    Ok(Json(entry))
}

#[utoipa::path(
    post,
    path = "/api/classes/{class_id}/startlist",
    params(
        ("class_id" = Uuid, Path, description = "Class id")
    ),
    request_body = CreateStartlistEntryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Entry created successfully", body = StartlistEntry),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Class not found"),
        (status = 409, description = "Start order already taken")
    ),
    tag = "startlist"
)]
pub async fn create_entry(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    ApiJson(req): ApiJson<CreateStartlistEntryRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let entry = services::create_entry(
        state.store(),
        state.directory.as_ref(),
        class_id,
        &req,
        local_now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/startlist/{startlist_id}",
    params(
        ("startlist_id" = Uuid, Path, description = "Start list entry id")
    ),
    request_body = UpdateStartlistEntryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Entry updated successfully", body = StartlistEntry),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Entry not found"),
        (status = 409, description = "Start order already taken")
    ),
    tag = "startlist"
)]
pub async fn update_entry(
    State(state): State<AppState>,
    Path(startlist_id): Path<Uuid>,
    ApiJson(update_req): ApiJson<UpdateStartlistEntryRequest>,
) -> Result<Json<StartlistEntry>, WebError> {
    update_req.validate()?;

    let updated = services::update_entry(
        state.store(),
        state.directory.as_ref(),
        startlist_id,
        &update_req,
    )
    .await?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/startlist/{startlist_id}",
    params(
        ("startlist_id" = Uuid, Path, description = "Start list entry id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Entry and its scores deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Entry not found")
    ),
    tag = "startlist"
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(startlist_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_entry(state.store(), startlist_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

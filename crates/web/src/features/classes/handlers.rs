use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::class::{ClassFilter, CreateClassRequest, UpdateClassRequest},
    dto::results::{ClassResults, ResultsQuery},
    models::CompetitionClass,
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
    path = "/api/classes",
    params(ClassFilter),
    responses(
        (status = 200, description = "List classes, optionally of one show", body = Vec<CompetitionClass>)
    ),
    tag = "classes"
)]
pub async fn list_classes(
    State(state): State<AppState>,
    Query(filter): Query<ClassFilter>,
) -> Result<Json<Vec<CompetitionClass>>, WebError> {
    let classes = services::list_classes(state.store(), filter.show_id).await?;

    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/{class_id}",
    params(
        ("class_id" = Uuid, Path, description = "Class id")
    ),
    responses(
        (status = 200, description = "Class found", body = CompetitionClass),
        (status = 404, description = "Class not found")
    ),
    tag = "classes"
)]
pub async fn get_class(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
) -> Result<Json<CompetitionClass>, WebError> {
    let class = services::get_class(state.store(), class_id).await?;

    Ok(Json(class))
}

#[utoipa::path(
    get,
    path = "/api/classes/{class_id}/results",
    params(
        ("class_id" = Uuid, Path, description = "Class id"),
        ResultsQuery
    ),
    responses(
        (status = 200, description = "Results board of one round or jump-off", body = ClassResults),
        (status = 404, description = "Class not found")
    ),
    tag = "classes"
)]
pub async fn get_results(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ClassResults>, WebError> {
    let results = services::get_results(state.store(), class_id, query.scope()).await?;

    Ok(Json(results))
}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Class created successfully", body = CompetitionClass),
        (status = 400, description = "Validation error, unknown rule or missing show"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "classes"
)]
pub async fn create_class(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateClassRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let class = services::create_class(state.store(), &req, local_now()).await?;

    Ok((StatusCode::CREATED, Json(class)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/classes/{class_id}",
    params(
        ("class_id" = Uuid, Path, description = "Class id")
    ),
    request_body = UpdateClassRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Class updated successfully", body = CompetitionClass),
        (status = 400, description = "Validation error or forbidden status change"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Class not found")
    ),
    tag = "classes"
)]
pub async fn update_class(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    ApiJson(update_req): ApiJson<UpdateClassRequest>,
) -> Result<Json<CompetitionClass>, WebError> {
    update_req.validate()?;

    let updated =
        services::update_class(state.store(), class_id, &update_req, local_now()).await?;

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{class_id}",
    params(
        ("class_id" = Uuid, Path, description = "Class id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Class deleted with its start list and scores"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Class not found")
    ),
    tag = "classes"
)]
pub async fn delete_class(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_class(state.store(), class_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

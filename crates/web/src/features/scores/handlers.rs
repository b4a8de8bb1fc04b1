use axum::{
    Json,
    extract::{Path, Query, State},
};
use storage::{
    dto::score::{ScoreFilter, SubmitScoreRequest, SubmitScoreResponse},
    models::Score,
    services::{Placing, local_now},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::extract::ApiJson;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/classes/{class_id}/scores",
    params(
        ("class_id" = Uuid, Path, description = "Class id"),
        ScoreFilter
    ),
    responses(
        (status = 200, description = "Scores of the class", body = Vec<Score>),
        (status = 404, description = "Class not found")
    ),
    tag = "scores"
)]
pub async fn list_class_scores(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Query(filter): Query<ScoreFilter>,
) -> Result<Json<Vec<Score>>, WebError> {
    let scores = services::list_class_scores(state.store(), class_id, &filter).await?;

    Ok(Json(scores))
}

#[utoipa::path(
    get,
    path = "/api/scores/{score_id}",
    params(
        ("score_id" = Uuid, Path, description = "Score id")
    ),
    responses(
        (status = 200, description = "Score found", body = Score),
        (status = 404, description = "Score not found")
    ),
    tag = "scores"
)]
pub async fn get_score(
    State(state): State<AppState>,
    Path(score_id): Path<Uuid>,
) -> Result<Json<Score>, WebError> {
    let score = services::get_score(state.store(), score_id).await?;

    Ok(Json(score))
}

#[utoipa::path(
    post,
    path = "/api/scores",
    request_body = SubmitScoreRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Score stored and class re-ranked", body = SubmitScoreResponse),
        (status = 400, description = "Validation error or class missing rule parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Class or entry not found")
    ),
    tag = "scores"
)]
pub async fn submit_score(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SubmitScoreRequest>,
) -> Result<Json<SubmitScoreResponse>, WebError> {
    req.validate()?;

    let response = services::submit_score(state.store(), &req, local_now()).await?;

    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/scores/{score_id}",
    params(
        ("score_id" = Uuid, Path, description = "Score id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Score deleted; placings of the class after re-ranking", body = Vec<Placing>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Score not found")
    ),
    tag = "scores"
)]
pub async fn delete_score(
    State(state): State<AppState>,
    Path(score_id): Path<Uuid>,
) -> Result<Json<Vec<Placing>>, WebError> {
    let placings = services::delete_score(state.store(), score_id, local_now()).await?;

    Ok(Json(placings))
}

use chrono::NaiveDateTime;
use storage::{
    CompetitionStore, EngineResult,
    dto::score::{ScoreFilter, SubmitScoreRequest, SubmitScoreResponse},
    error::NotFoundContext,
    models::Score,
    services::{self, Placing},
};
use uuid::Uuid;

use crate::features::classes::services::get_class;

/// Scores of a class, optionally narrowed to one round or the jump-offs
pub async fn list_class_scores(
    store: &dyn CompetitionStore,
    class_id: Uuid,
    filter: &ScoreFilter,
) -> EngineResult<Vec<Score>> {
    get_class(store, class_id).await?;
    let scores = store.list_class_scores(class_id).await?;

    Ok(scores.into_iter().filter(|s| filter.matches(s)).collect())
}

pub async fn get_score(store: &dyn CompetitionStore, score_id: Uuid) -> EngineResult<Score> {
    store
        .find_score(score_id)
        .await
        .or_not_found(|| format!("Score {score_id} not found"))
}

pub async fn submit_score(
    store: &dyn CompetitionStore,
    request: &SubmitScoreRequest,
    now: NaiveDateTime,
) -> EngineResult<SubmitScoreResponse> {
    services::submit_score(store, request, now).await
}

pub async fn delete_score(
    store: &dyn CompetitionStore,
    score_id: Uuid,
    now: NaiveDateTime,
) -> EngineResult<Vec<Placing>> {
    services::delete_score(store, score_id, now).await
}

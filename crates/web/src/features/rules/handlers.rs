use axum::{Json, extract::Path};
use storage::dto::rules::RuleDescription;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rules",
    responses(
        (status = 200, description = "The eleven class rules and how each one scores", body = Vec<RuleDescription>)
    ),
    tag = "rules"
)]
pub async fn list_rules() -> Json<Vec<RuleDescription>> {
    Json(services::list_rules())
}

#[utoipa::path(
    get,
    path = "/api/rules/{rule}",
    params(
        ("rule" = String, Path, description = "Rule name, e.g. two_rounds_with_tiebreaker")
    ),
    responses(
        (status = 200, description = "Rule found", body = RuleDescription),
        (status = 400, description = "Unknown rule")
    ),
    tag = "rules"
)]
pub async fn get_rule(Path(rule): Path<String>) -> Result<Json<RuleDescription>, WebError> {
    let description = services::get_rule(&rule)?;

    Ok(Json(description))
}

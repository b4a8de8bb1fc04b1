use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use storage::services::{ReconcileReport, local_now};
use utoipa::IntoParams;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ReconcileParams {
    /// Report the changes without writing them
    #[serde(default)]
    pub dry_run: bool,
}

/// Entry point for the external scheduler; GET and POST behave the same.
#[utoipa::path(
    post,
    path = "/api/status/reconcile",
    params(ReconcileParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Statuses reconciled with the schedule", body = ReconcileReport),
        (status = 401, description = "Unauthorized")
    ),
    tag = "status"
)]
pub async fn reconcile(
    State(state): State<AppState>,
    Query(params): Query<ReconcileParams>,
) -> Result<Json<ReconcileReport>, WebError> {
    let report = services::reconcile(state.store(), local_now(), params.dry_run).await?;

    Ok(Json(report))
}

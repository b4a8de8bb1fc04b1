use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::features::{classes, rules, scores, shows, startlist, status};
use crate::middleware::auth::ApiKeys;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        shows::handlers::list_shows,
        shows::handlers::get_show,
        shows::handlers::list_show_classes,
        shows::handlers::create_show,
        shows::handlers::update_show,
        shows::handlers::delete_show,
        classes::handlers::list_classes,
        classes::handlers::get_class,
        classes::handlers::get_results,
        classes::handlers::create_class,
        classes::handlers::update_class,
        classes::handlers::delete_class,
        startlist::handlers::list_entries,
        startlist::handlers::get_entry,
        startlist::handlers::create_entry,
        startlist::handlers::update_entry,
        startlist::handlers::delete_entry,
        scores::handlers::list_class_scores,
        scores::handlers::get_score,
        scores::handlers::submit_score,
        scores::handlers::delete_score,
        rules::handlers::list_rules,
        rules::handlers::get_rule,
        status::handlers::reconcile,
    ),
    components(
        schemas(
            storage::dto::show::CreateShowRequest,
            storage::dto::show::UpdateShowRequest,
            storage::dto::class::CreateClassRequest,
            storage::dto::class::UpdateClassRequest,
            storage::dto::startlist::CreateStartlistEntryRequest,
            storage::dto::startlist::UpdateStartlistEntryRequest,
            storage::dto::score::SubmitScoreRequest,
            storage::dto::score::SubmitScoreResponse,
            storage::dto::results::ClassResults,
            storage::dto::results::ResultRow,
            storage::dto::rules::RuleDescription,
            storage::models::Show,
            storage::models::CompetitionClass,
            storage::models::StartlistEntry,
            storage::models::Score,
            storage::models::EventStatus,
            storage::models::ShowType,
            storage::models::ScoreStatus,
            storage::rules::ClassRule,
            storage::rules::ClassParameter,
            storage::rules::RoundPlan,
            storage::rules::ScoringBasis,
            storage::rules::TimeMode,
            storage::rules::TimeDecider,
            storage::services::Placing,
            storage::services::TeamStanding,
            storage::services::ReconcileReport,
            storage::services::StatusChange,
            storage::services::reconciler::EntityKind,
        )
    ),
    tags(
        (name = "shows", description = "Shows and their schedule"),
        (name = "classes", description = "Classes, their rules and results"),
        (name = "startlist", description = "Start list entries of a class"),
        (name = "scores", description = "Score submission and corrections"),
        (name = "rules", description = "Class rule catalog"),
        (name = "status", description = "Status reconciliation trigger"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "status"
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState, api_keys: ApiKeys) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let api = Router::new()
        .route("/health", get(health))
        .nest("/shows", shows::routes::routes(api_keys.clone()))
        .nest("/classes", classes::routes::routes(api_keys.clone()))
        .nest("/startlist", startlist::routes::routes(api_keys.clone()))
        .nest("/scores", scores::routes::routes(api_keys.clone()))
        .nest("/rules", rules::routes::routes())
        .nest("/status", status::routes::routes(api_keys));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

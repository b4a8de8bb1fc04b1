use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    create_class, delete_class, get_class, get_results, list_classes, update_class,
};
use crate::features::{scores, startlist};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_class))
        .route("/:class_id", put(update_class))
        .route("/:class_id", delete(delete_class))
        .route(
            "/:class_id/startlist",
            post(startlist::handlers::create_entry),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_classes))
        .route("/:class_id", get(get_class))
        .route("/:class_id/results", get(get_results))
        .route(
            "/:class_id/startlist",
            get(startlist::handlers::list_entries),
        )
        .route("/:class_id/scores", get(scores::handlers::list_class_scores))
        .merge(protected)
}

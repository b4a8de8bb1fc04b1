use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use super::handlers::{delete_score, get_score, submit_score};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(submit_score))
        .route("/:score_id", delete(delete_score))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:score_id", get(get_score))
        .merge(protected)
}

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    create_show, delete_show, get_show, list_show_classes, list_shows, update_show,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_show))
        .route("/:show_id", put(update_show))
        .route("/:show_id", delete(delete_show))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_shows))
        .route("/:show_id", get(get_show))
        .route("/:show_id/classes", get(list_show_classes))
        .merge(protected)
}

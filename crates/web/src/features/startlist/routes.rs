use axum::{
    Router, middleware,
    routing::{delete, get, put},
};

use super::handlers::{delete_entry, get_entry, update_entry};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

/// Routes addressed by entry id; listing and creation hang off `/api/classes/{class_id}`.
pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/:startlist_id", put(update_entry))
        .route("/:startlist_id", delete(delete_entry))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:startlist_id", get(get_entry))
        .merge(protected)
}

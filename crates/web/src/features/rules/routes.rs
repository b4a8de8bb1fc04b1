use axum::{Router, routing::get};

use super::handlers::{get_rule, list_rules};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rules))
        .route("/:rule", get(get_rule))
}

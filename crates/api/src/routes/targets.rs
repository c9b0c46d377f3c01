use axum::routing::{get, post};
use axum::Router;

use crate::handlers::targets;
use crate::state::AppState;

/// Target counter routes mounted at `/targets`.
///
/// ```text
/// GET    /{target_type}/{target_id}/counters   -> get_counters
/// POST   /{target_type}/{target_id}/recount    -> recount (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{target_type}/{target_id}/counters",
            get(targets::get_counters),
        )
        .route("/{target_type}/{target_id}/recount", post(targets::recount))
}

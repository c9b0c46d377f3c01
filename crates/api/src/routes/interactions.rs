use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::interactions;
use crate::state::AppState;

/// Interaction routes mounted at `/interactions`.
///
/// ```text
/// POST   /{kind}/{target_type}/toggle        -> toggle_interaction
/// GET    /{kind}/{target_type}               -> list_interactions
/// GET    /{kind}/{target_type}/active-ids    -> active_target_ids
/// DELETE /{kind}/{target_type}/{target_id}   -> deactivate_interaction
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{kind}/{target_type}", get(interactions::list_interactions))
        .route(
            "/{kind}/{target_type}/toggle",
            post(interactions::toggle_interaction),
        )
        .route(
            "/{kind}/{target_type}/active-ids",
            get(interactions::active_target_ids),
        )
        .route(
            "/{kind}/{target_type}/{target_id}",
            delete(interactions::deactivate_interaction),
        )
}

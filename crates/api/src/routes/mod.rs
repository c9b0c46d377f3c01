pub mod comments;
pub mod follows;
pub mod health;
pub mod interactions;
pub mod shares;
pub mod targets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /interactions/{kind}/{target_type}/toggle        toggle (POST)
/// /interactions/{kind}/{target_type}               caller's records (GET)
/// /interactions/{kind}/{target_type}/active-ids    caller's active target ids (GET)
/// /interactions/{kind}/{target_type}/{target_id}   deactivate (DELETE)
///
/// /follows                                         list follows (GET)
/// /follows/toggle                                  follow toggle (POST)
///
/// /targets/{target_type}/{target_id}/counters      counters (GET)
/// /targets/{target_type}/{target_id}/recount       recount (POST, admin only)
///
/// /comments                                        list, create (GET, POST)
/// /comments/{id}                                   soft delete (DELETE, author only)
///
/// /contents/{id}/share                             share (POST)
/// /dynamics/{id}/share                             share (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/interactions", interactions::router())
        .nest("/follows", follows::router())
        .nest("/targets", targets::router())
        .nest("/comments", comments::router())
        .merge(shares::router())
}

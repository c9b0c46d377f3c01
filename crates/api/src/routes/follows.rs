use axum::routing::{get, post};
use axum::Router;

use crate::handlers::follows;
use crate::state::AppState;

/// Follow routes mounted at `/follows`.
///
/// ```text
/// GET    /          -> list_follows
/// POST   /toggle    -> toggle_follow
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(follows::list_follows))
        .route("/toggle", post(follows::toggle_follow))
}

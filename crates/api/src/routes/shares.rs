use axum::routing::post;
use axum::Router;

use crate::handlers::shares;
use crate::state::AppState;

/// Share routes, mounted at the `/api/v1` root.
///
/// ```text
/// POST   /contents/{id}/share   -> share_content
/// POST   /dynamics/{id}/share   -> share_dynamic
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contents/{id}/share", post(shares::share_content))
        .route("/dynamics/{id}/share", post(shares::share_dynamic))
}

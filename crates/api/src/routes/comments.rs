use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Comment routes mounted at `/comments`.
///
/// ```text
/// GET    /        -> list_comments
/// POST   /        -> create_comment
/// DELETE /{id}    -> delete_comment (author only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/{id}", delete(comments::delete_comment))
}

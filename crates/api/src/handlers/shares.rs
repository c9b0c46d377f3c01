//! Share counting for contents and dynamics.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use kudos_core::counter::ensure_shareable;
use kudos_core::interaction::{validate_target_id, TargetType};
use kudos_core::types::DbId;
use kudos_db::repositories::CounterRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppPath;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ShareOutcome {
    pub target_type: TargetType,
    pub target_id: DbId,
    pub share_count: i64,
}

async fn share(
    state: &AppState,
    user: &AuthUser,
    target_type: TargetType,
    target_id: DbId,
) -> AppResult<ShareOutcome> {
    ensure_shareable(target_type)?;
    validate_target_id(target_id)?;

    let share_count = CounterRepo::increment_share(&state.pool, target_type, target_id)
        .await?
        .ok_or_else(|| AppError::from(target_type.not_found(target_id)))?;

    tracing::info!(
        target_type = %target_type,
        target_id,
        user_id = user.user_id,
        share_count,
        "Target shared",
    );

    Ok(ShareOutcome {
        target_type,
        target_id,
        share_count,
    })
}

/// POST /api/v1/contents/{id}/share
pub async fn share_content(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = share(&state, &auth, TargetType::Content, id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/dynamics/{id}/share
pub async fn share_dynamic(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = share(&state, &auth, TargetType::Dynamic, id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

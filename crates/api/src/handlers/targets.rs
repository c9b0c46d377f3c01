//! Counter reads and the admin recount for target entities.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use kudos_core::interaction::{validate_target_id, TargetType};
use kudos_core::types::DbId;
use kudos_db::repositories::CounterRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppPath;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/targets/{target_type}/{target_id}/counters
pub async fn get_counters(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppPath((target_type, target_id)): AppPath<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let target_type = TargetType::from_str_value(&target_type)?;
    validate_target_id(target_id)?;

    let counters = CounterRepo::counters(&state.pool, target_type, target_id)
        .await?
        .ok_or_else(|| AppError::from(target_type.not_found(target_id)))?;

    Ok(Json(DataResponse { data: counters }))
}

/// POST /api/v1/targets/{target_type}/{target_id}/recount
///
/// Recompute a target's counters from the stored records. Admin only.
pub async fn recount(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath((target_type, target_id)): AppPath<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let target_type = TargetType::from_str_value(&target_type)?;
    validate_target_id(target_id)?;

    let before = CounterRepo::counters(&state.pool, target_type, target_id).await?;
    let after = CounterRepo::recount(&state.pool, target_type, target_id)
        .await?
        .ok_or_else(|| AppError::from(target_type.not_found(target_id)))?;

    let drifted = before.is_some_and(|b| b.counters != after.counters);
    if drifted {
        tracing::warn!(
            target_type = %target_type,
            target_id,
            user_id = admin.user_id,
            "Counter drift repaired",
        );
    } else {
        tracing::info!(
            target_type = %target_type,
            target_id,
            user_id = admin.user_id,
            "Counters recounted",
        );
    }

    Ok(Json(DataResponse { data: after }))
}

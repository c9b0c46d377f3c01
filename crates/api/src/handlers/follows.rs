//! Handlers for the follow graph.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use kudos_core::interaction::{InteractionKind, InteractionStatus, TargetType};
use kudos_core::pagination::{PageRequest, Paginated};
use kudos_db::models::interaction::{FollowListParams, FollowToggleRequest};
use kudos_db::repositories::InteractionRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::handlers::interactions::run_toggle;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/follows/toggle
///
/// Follow or unfollow a user. Keeps the followee's `followers_count` and
/// the caller's `following_count` in step.
pub async fn toggle_follow(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<FollowToggleRequest>,
) -> AppResult<impl IntoResponse> {
    let response = run_toggle(
        &state.pool,
        auth.user_id,
        InteractionKind::Follow,
        TargetType::User,
        input.followee_id,
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/follows
///
/// Follow records filtered by `follower_id` and/or `followee_id`. Only
/// active follows unless `status` says otherwise.
pub async fn list_follows(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<FollowListParams>,
) -> AppResult<impl IntoResponse> {
    let page = PageRequest::new(params.current_page, params.page_size);
    let status = params.status.unwrap_or(InteractionStatus::Active);

    let (records, total) = InteractionRepo::list_follows(
        &state.pool,
        params.follower_id,
        params.followee_id,
        status,
        page,
    )
    .await?;

    Ok(Json(DataResponse {
        data: Paginated::new(page, total, records),
    }))
}

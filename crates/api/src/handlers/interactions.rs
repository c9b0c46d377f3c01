//! Handlers for likes, favorites, downvotes, and follows addressed by
//! `{kind}/{target_type}`.
//!
//! Every write resolves the counter bindings of the pair up front, so an
//! unsupported pair is rejected before anything is stored. The acting user
//! always comes from the bearer token.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use kudos_core::counter::{bindings_for, primary_binding, CounterField};
use kudos_core::error::CoreError;
use kudos_core::interaction::{
    ensure_not_self_target, validate_target_id, InteractionKind, InteractionStatus, TargetType,
};
use kudos_core::pagination::{PageRequest, Paginated};
use kudos_core::types::DbId;
use kudos_db::models::interaction::{
    InteractionKey, InteractionListParams, InteractionRecord, InteractionWrite, ToggleRequest,
};
use kudos_db::repositories::{CounterRepo, InteractionRepo, TargetRepo};
use kudos_db::DbPool;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Payload of a toggle or deactivate response.
#[derive(Debug, Serialize)]
pub struct ToggleOutcome {
    pub record: InteractionRecord,
    /// The record was created by this request.
    pub created: bool,
    /// The target's primary counter after the write; `None` when the
    /// target row no longer exists.
    pub counter: Option<CounterValue>,
}

#[derive(Debug, Serialize)]
pub struct CounterValue {
    pub field: CounterField,
    pub value: i64,
}

/// Parse the `{kind}/{target_type}` path segments.
fn parse_pair(kind: &str, target_type: &str) -> Result<(InteractionKind, TargetType), CoreError> {
    Ok((
        InteractionKind::from_str_value(kind)?,
        TargetType::from_str_value(target_type)?,
    ))
}

/// Toggle one interaction on behalf of `actor_id`.
///
/// Shared by the generic toggle route and the follow route.
pub(crate) async fn run_toggle(
    pool: &DbPool,
    actor_id: DbId,
    kind: InteractionKind,
    target_type: TargetType,
    target_id: DbId,
) -> AppResult<MessageResponse<ToggleOutcome>> {
    validate_target_id(target_id)?;
    let bindings = bindings_for(kind, target_type)?;
    ensure_not_self_target(kind, target_type, actor_id, target_id)?;

    if !TargetRepo::exists(pool, target_type, target_id).await? {
        return Err(target_type.not_found(target_id).into());
    }

    let key = InteractionKey::new(actor_id, kind, target_type, target_id);
    let write = InteractionRepo::toggle(pool, key, bindings).await?;

    tracing::info!(
        actor_id,
        target_id,
        kind = %kind,
        target_type = %target_type,
        status = %write.record.status,
        created = write.created,
        "Interaction toggled",
    );

    outcome(pool, kind, target_type, write).await
}

/// Build the response for a committed write, reading the refreshed
/// primary counter.
async fn outcome(
    pool: &DbPool,
    kind: InteractionKind,
    target_type: TargetType,
    write: InteractionWrite,
) -> AppResult<MessageResponse<ToggleOutcome>> {
    let primary = primary_binding(kind, target_type)?;
    let subject_id = primary.subject_id(write.record.actor_id, write.record.target_id);
    let counter = CounterRepo::get_counter(pool, primary.table_type, subject_id, primary.field)
        .await?
        .map(|value| CounterValue {
            field: primary.field,
            value,
        });

    Ok(MessageResponse {
        message: kind.outcome_message(write.record.status),
        data: ToggleOutcome {
            created: write.created,
            record: write.record,
            counter,
        },
    })
}

/// POST /api/v1/interactions/{kind}/{target_type}/toggle
///
/// Flip the caller's interaction with a target. The first call creates an
/// active record.
pub async fn toggle_interaction(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((kind, target_type)): AppPath<(String, String)>,
    AppJson(input): AppJson<ToggleRequest>,
) -> AppResult<impl IntoResponse> {
    let (kind, target_type) = parse_pair(&kind, &target_type)?;
    let response = run_toggle(&state.pool, auth.user_id, kind, target_type, input.target_id).await?;
    Ok(Json(response))
}

/// DELETE /api/v1/interactions/{kind}/{target_type}/{target_id}
///
/// Deactivate the caller's interaction. Records are never removed; a
/// repeated delete leaves counters untouched.
pub async fn deactivate_interaction(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((kind, target_type, target_id)): AppPath<(String, String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let (kind, target_type) = parse_pair(&kind, &target_type)?;
    validate_target_id(target_id)?;
    let bindings = bindings_for(kind, target_type)?;

    let key = InteractionKey::new(auth.user_id, kind, target_type, target_id);
    let write = InteractionRepo::set_status(&state.pool, key, InteractionStatus::Inactive, bindings)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Interaction",
            id: target_id,
        }))?;

    tracing::info!(
        actor_id = auth.user_id,
        target_id,
        kind = %kind,
        target_type = %target_type,
        changed = write.transition.is_some(),
        "Interaction deactivated",
    );

    Ok(Json(outcome(&state.pool, kind, target_type, write).await?))
}

/// GET /api/v1/interactions/{kind}/{target_type}
///
/// The caller's records of one kind, newest first.
pub async fn list_interactions(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((kind, target_type)): AppPath<(String, String)>,
    AppQuery(params): AppQuery<InteractionListParams>,
) -> AppResult<impl IntoResponse> {
    let (kind, target_type) = parse_pair(&kind, &target_type)?;
    bindings_for(kind, target_type)?;
    let page = PageRequest::new(params.current_page, params.page_size);

    let (records, total) = InteractionRepo::list_for_actor(
        &state.pool,
        auth.user_id,
        kind,
        target_type,
        params.status,
        page,
    )
    .await?;

    Ok(Json(DataResponse {
        data: Paginated::new(page, total, records),
    }))
}

/// GET /api/v1/interactions/{kind}/{target_type}/active-ids
///
/// Ids of the targets the caller currently has an active interaction with.
pub async fn active_target_ids(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((kind, target_type)): AppPath<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let (kind, target_type) = parse_pair(&kind, &target_type)?;
    bindings_for(kind, target_type)?;

    let ids =
        InteractionRepo::active_target_ids(&state.pool, auth.user_id, kind, target_type).await?;

    Ok(Json(DataResponse { data: ids }))
}

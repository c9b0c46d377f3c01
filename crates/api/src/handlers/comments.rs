//! Handlers for comments on contents and dynamics.
//!
//! Comments drive the target's `comment_count` and, for replies, the
//! parent's `reply_count`. Deletion is a soft delete by the author.

use std::collections::HashSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kudos_core::counter::{comment_binding, ensure_commentable};
use kudos_core::error::CoreError;
use kudos_core::interaction::{validate_target_id, InteractionKind, TargetType};
use kudos_core::pagination::{PageRequest, Paginated};
use kudos_core::types::DbId;
use kudos_db::models::comment::{CommentListParams, CommentView, CreateComment};
use kudos_db::repositories::{CommentRepo, InteractionRepo, TargetRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn comment_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Comment",
        id,
    })
}

/// POST /api/v1/comments
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateComment>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    let binding = comment_binding(input.target_type)?;

    if !TargetRepo::exists(&state.pool, input.target_type, input.target_id).await? {
        return Err(input.target_type.not_found(input.target_id).into());
    }

    if let Some(parent_id) = input.parent_comment_id {
        let parent = CommentRepo::find_by_id(&state.pool, parent_id)
            .await?
            .filter(|c| c.status.is_active())
            .ok_or_else(|| comment_not_found(parent_id))?;
        if parent.target_type != input.target_type || parent.target_id != input.target_id {
            return Err(CoreError::InvalidOperation(
                "parent comment belongs to a different target".to_string(),
            )
            .into());
        }
    }

    let comment = CommentRepo::create(&state.pool, auth.user_id, &input, &binding).await?;

    tracing::info!(
        comment_id = comment.id,
        user_id = auth.user_id,
        target_type = %comment.target_type,
        target_id = comment.target_id,
        parent_comment_id = ?comment.parent_comment_id,
        "Comment created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// GET /api/v1/comments?target_type=&target_id=
///
/// Active top-level comments on a target, or the replies to
/// `parent_comment_id`, each marked with whether the caller liked it.
pub async fn list_comments(
    auth: AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<CommentListParams>,
) -> AppResult<impl IntoResponse> {
    ensure_commentable(params.target_type)?;
    validate_target_id(params.target_id)?;
    if let Some(parent_id) = params.parent_comment_id {
        validate_target_id(parent_id)?;
    }
    let page = PageRequest::new(params.current_page, params.page_size);

    let (comments, total) = CommentRepo::list_for_target(
        &state.pool,
        params.target_type,
        params.target_id,
        params.parent_comment_id,
        params.ordering,
        page,
    )
    .await?;

    let ids: Vec<DbId> = comments.iter().map(|c| c.id).collect();
    let liked: HashSet<DbId> = InteractionRepo::active_among(
        &state.pool,
        auth.user_id,
        InteractionKind::Like,
        TargetType::Comment,
        &ids,
    )
    .await?
    .into_iter()
    .collect();

    let views = comments
        .into_iter()
        .map(|comment| CommentView {
            is_liked: liked.contains(&comment.id),
            comment,
        })
        .collect();

    Ok(Json(DataResponse {
        data: Paginated::new(page, total, views),
    }))
}

/// DELETE /api/v1/comments/{id}
///
/// Soft-delete the caller's own comment.
pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(comment_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let comment = CommentRepo::find_by_id(&state.pool, comment_id)
        .await?
        .filter(|c| c.status.is_active())
        .ok_or_else(|| comment_not_found(comment_id))?;

    if comment.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author may delete a comment".into(),
        )));
    }

    let binding = comment_binding(comment.target_type)?;
    let (_, changed) = CommentRepo::soft_delete(&state.pool, comment_id, &binding)
        .await?
        .ok_or_else(|| comment_not_found(comment_id))?;

    tracing::info!(comment_id, user_id = auth.user_id, changed, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}

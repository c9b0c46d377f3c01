//! Repository for the `comments` table.
//!
//! Comments follow the same soft-delete policy as interaction records:
//! deletion flips `status` to `inactive`, and the target's `comment_count`
//! (plus the parent's `reply_count` for replies) moves only on a real
//! status change.

use kudos_core::counter::{CounterBinding, REPLY_BINDING};
use kudos_core::interaction::{InteractionStatus, StatusTransition, TargetType, STATUS_ACTIVE};
use kudos_core::pagination::PageRequest;
use kudos_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentOrdering, CreateComment};
use crate::repositories::CounterRepo;

/// Column list for `comments` queries.
const COLUMNS: &str = "\
    id, user_id, target_type, target_id, parent_comment_id, body, status, \
    like_count, reply_count, created_at, updated_at";

/// Provides comment creation, soft deletion, and listing.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert an active comment and bump the target's comment counters.
    ///
    /// `target_binding` is the target's `comment_count` binding
    /// (`kudos_core::counter::comment_binding`).
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateComment,
        target_binding: &CounterBinding,
    ) -> Result<Comment, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO comments (user_id, target_type, target_id, parent_comment_id, body, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(user_id)
            .bind(input.target_type.as_str())
            .bind(input.target_id)
            .bind(input.parent_comment_id)
            .bind(&input.body)
            .bind(STATUS_ACTIVE)
            .fetch_one(&mut *tx)
            .await?;

        CounterRepo::apply_transition(
            &mut tx,
            std::slice::from_ref(target_binding),
            user_id,
            comment.target_id,
            StatusTransition::Activated,
        )
        .await?;

        if let Some(parent_id) = comment.parent_comment_id {
            CounterRepo::apply_transition(
                &mut tx,
                &[REPLY_BINDING],
                user_id,
                parent_id,
                StatusTransition::Activated,
            )
            .await?;
        }

        tx.commit().await?;
        Ok(comment)
    }

    /// Find a comment by id, regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a comment.
    ///
    /// Returns the comment and whether this call changed its status, or
    /// `None` if it does not exist.
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        target_binding: &CounterBinding,
    ) -> Result<Option<(Comment, bool)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        if StatusTransition::between(current.status, InteractionStatus::Inactive).is_none() {
            return Ok(Some((current, false)));
        }

        let update = format!("UPDATE comments SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let comment = sqlx::query_as::<_, Comment>(&update)
            .bind(id)
            .bind(InteractionStatus::Inactive.as_str())
            .fetch_one(&mut *tx)
            .await?;

        CounterRepo::apply_transition(
            &mut tx,
            std::slice::from_ref(target_binding),
            comment.user_id,
            comment.target_id,
            StatusTransition::Deactivated,
        )
        .await?;

        if let Some(parent_id) = comment.parent_comment_id {
            CounterRepo::apply_transition(
                &mut tx,
                &[REPLY_BINDING],
                comment.user_id,
                parent_id,
                StatusTransition::Deactivated,
            )
            .await?;
        }

        tx.commit().await?;
        Ok(Some((comment, true)))
    }

    /// One page of active comments on a target.
    ///
    /// `parent_comment_id = None` lists top-level comments only; `Some(id)`
    /// lists the replies to comment `id`.
    pub async fn list_for_target(
        pool: &PgPool,
        target_type: TargetType,
        target_id: DbId,
        parent_comment_id: Option<DbId>,
        ordering: CommentOrdering,
        page: PageRequest,
    ) -> Result<(Vec<Comment>, i64), sqlx::Error> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments \
             WHERE target_type = $1 AND target_id = $2 AND status = $3 \
               AND parent_comment_id IS NOT DISTINCT FROM $4::BIGINT",
        )
        .bind(target_type.as_str())
        .bind(target_id)
        .bind(STATUS_ACTIVE)
        .bind(parent_comment_id)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM comments \
             WHERE target_type = $1 AND target_id = $2 AND status = $3 \
               AND parent_comment_id IS NOT DISTINCT FROM $4::BIGINT \
             ORDER BY {} \
             LIMIT $5 OFFSET $6",
            ordering.order_by()
        );
        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(target_type.as_str())
            .bind(target_id)
            .bind(STATUS_ACTIVE)
            .bind(parent_comment_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok((comments, total))
    }
}

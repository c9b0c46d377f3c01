//! Interaction record model and the lookup key / write outcome types.

use kudos_core::interaction::{InteractionKind, InteractionStatus, StatusTransition, TargetType};
use kudos_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `interactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InteractionRecord {
    pub id: DbId,
    pub actor_id: DbId,
    #[sqlx(try_from = "String")]
    pub kind: InteractionKind,
    #[sqlx(try_from = "String")]
    pub target_type: TargetType,
    pub target_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: InteractionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The uniqueness tuple of an interaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionKey {
    pub actor_id: DbId,
    pub kind: InteractionKind,
    pub target_type: TargetType,
    pub target_id: DbId,
}

impl InteractionKey {
    pub fn new(
        actor_id: DbId,
        kind: InteractionKind,
        target_type: TargetType,
        target_id: DbId,
    ) -> Self {
        Self {
            actor_id,
            kind,
            target_type,
            target_id,
        }
    }
}

/// Result of a write to the record store.
#[derive(Debug, Clone)]
pub struct InteractionWrite {
    pub record: InteractionRecord,
    /// The row was inserted by this write.
    pub created: bool,
    /// The status change applied, `None` for a no-op write.
    pub transition: Option<StatusTransition>,
}

/// Body of `POST /interactions/{kind}/{target_type}/toggle`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleRequest {
    pub target_id: DbId,
}

/// Body of `POST /follows/toggle`.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowToggleRequest {
    pub followee_id: DbId,
}

/// Query parameters for listing the caller's interaction records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionListParams {
    /// Only records in this status (`active` / `inactive`).
    pub status: Option<InteractionStatus>,
    #[serde(rename = "currentPage")]
    pub current_page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

/// Query parameters for `GET /follows`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowListParams {
    pub follower_id: Option<DbId>,
    pub followee_id: Option<DbId>,
    /// Defaults to active follows only.
    pub status: Option<InteractionStatus>,
    #[serde(rename = "currentPage")]
    pub current_page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

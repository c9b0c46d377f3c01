//! Comment model and DTOs.

use kudos_core::interaction::{InteractionStatus, TargetType};
use kudos_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub user_id: DbId,
    #[sqlx(try_from = "String")]
    pub target_type: TargetType,
    pub target_id: DbId,
    pub parent_comment_id: Option<DbId>,
    pub body: String,
    #[sqlx(try_from = "String")]
    pub status: InteractionStatus,
    pub like_count: i64,
    pub reply_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /comments`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    pub target_type: TargetType,
    #[validate(range(min = 1))]
    pub target_id: DbId,
    #[validate(range(min = 1))]
    pub parent_comment_id: Option<DbId>,
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

/// A comment as listed for a viewer.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    /// The viewer has an active like on this comment.
    pub is_liked: bool,
}

/// Sort order for comment listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum CommentOrdering {
    #[default]
    #[serde(rename = "-created_at")]
    Newest,
    #[serde(rename = "created_at")]
    Oldest,
    #[serde(rename = "-like_count")]
    MostLiked,
}

impl CommentOrdering {
    /// `ORDER BY` clause for this ordering.
    pub fn order_by(self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC, id DESC",
            Self::Oldest => "created_at ASC, id ASC",
            Self::MostLiked => "like_count DESC, created_at DESC, id DESC",
        }
    }
}

/// Query parameters for `GET /comments`.
///
/// Without `parent_comment_id` only top-level comments are listed; with it,
/// the replies to that comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentListParams {
    pub target_type: TargetType,
    pub target_id: DbId,
    pub parent_comment_id: Option<DbId>,
    #[serde(default)]
    pub ordering: CommentOrdering,
    #[serde(rename = "currentPage")]
    pub current_page: Option<i64>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<i64>,
}

//! Denormalized counter columns and the table binding interactions to them.
//!
//! Every supported `(InteractionKind, TargetType)` pair maps to one or more
//! [`CounterBinding`]s. A binding names the table/column to adjust and
//! whose row (the target's or the actor's) receives the adjustment. Pairs
//! that are not in the table are rejected before any write.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::interaction::{InteractionKind, TargetType};
use crate::types::DbId;

/// A counter column on a target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    LikeCount,
    FavoriteCount,
    DownvoteCount,
    CommentCount,
    ReplyCount,
    ShareCount,
    FollowersCount,
    FollowingCount,
}

impl CounterField {
    /// Column name. Also the JSON key in counter responses.
    pub fn column(&self) -> &'static str {
        match self {
            Self::LikeCount => "like_count",
            Self::FavoriteCount => "favorite_count",
            Self::DownvoteCount => "downvote_count",
            Self::CommentCount => "comment_count",
            Self::ReplyCount => "reply_count",
            Self::ShareCount => "share_count",
            Self::FollowersCount => "followers_count",
            Self::FollowingCount => "following_count",
        }
    }
}

impl std::fmt::Display for CounterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Whose row a binding adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterSubject {
    /// The interaction's target row.
    Target,
    /// The acting user's row (e.g. `following_count`).
    Actor,
}

/// One counter maintained by an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterBinding {
    pub table_type: TargetType,
    pub field: CounterField,
    pub subject: CounterSubject,
}

impl CounterBinding {
    const fn target(table_type: TargetType, field: CounterField) -> Self {
        Self {
            table_type,
            field,
            subject: CounterSubject::Target,
        }
    }

    const fn actor(table_type: TargetType, field: CounterField) -> Self {
        Self {
            table_type,
            field,
            subject: CounterSubject::Actor,
        }
    }

    /// Row id this binding adjusts for the given interaction.
    pub fn subject_id(&self, actor_id: DbId, target_id: DbId) -> DbId {
        match self.subject {
            CounterSubject::Target => target_id,
            CounterSubject::Actor => actor_id,
        }
    }
}

const LIKE_CONTENT: &[CounterBinding] =
    &[CounterBinding::target(TargetType::Content, CounterField::LikeCount)];
const LIKE_DYNAMIC: &[CounterBinding] =
    &[CounterBinding::target(TargetType::Dynamic, CounterField::LikeCount)];
const LIKE_COMMENT: &[CounterBinding] =
    &[CounterBinding::target(TargetType::Comment, CounterField::LikeCount)];
const FAVORITE_CONTENT: &[CounterBinding] =
    &[CounterBinding::target(TargetType::Content, CounterField::FavoriteCount)];
const FAVORITE_DYNAMIC: &[CounterBinding] =
    &[CounterBinding::target(TargetType::Dynamic, CounterField::FavoriteCount)];
const DOWNVOTE_CONTENT: &[CounterBinding] =
    &[CounterBinding::target(TargetType::Content, CounterField::DownvoteCount)];
const FOLLOW_USER: &[CounterBinding] = &[
    CounterBinding::target(TargetType::User, CounterField::FollowersCount),
    CounterBinding::actor(TargetType::User, CounterField::FollowingCount),
];

/// Counters maintained when `kind` is applied to `target_type`.
///
/// The first binding is the target's primary counter. Unsupported pairs
/// return [`CoreError::InvalidOperation`].
pub fn bindings_for(
    kind: InteractionKind,
    target_type: TargetType,
) -> Result<&'static [CounterBinding], CoreError> {
    use InteractionKind as K;
    use TargetType as T;

    match (kind, target_type) {
        (K::Like, T::Content) => Ok(LIKE_CONTENT),
        (K::Like, T::Dynamic) => Ok(LIKE_DYNAMIC),
        (K::Like, T::Comment) => Ok(LIKE_COMMENT),
        (K::Favorite, T::Content) => Ok(FAVORITE_CONTENT),
        (K::Favorite, T::Dynamic) => Ok(FAVORITE_DYNAMIC),
        (K::Downvote, T::Content) => Ok(DOWNVOTE_CONTENT),
        (K::Follow, T::User) => Ok(FOLLOW_USER),
        _ => Err(CoreError::InvalidOperation(format!(
            "'{kind}' is not supported on target type '{target_type}'"
        ))),
    }
}

/// Primary counter for a supported pair.
pub fn primary_binding(
    kind: InteractionKind,
    target_type: TargetType,
) -> Result<CounterBinding, CoreError> {
    let bindings = bindings_for(kind, target_type)?;
    bindings.first().copied().ok_or_else(|| {
        CoreError::Internal(format!("no counter bound to '{kind}' on '{target_type}'"))
    })
}

/// Every counter column a target table carries.
pub fn counter_fields(target_type: TargetType) -> &'static [CounterField] {
    use CounterField as F;

    match target_type {
        TargetType::Content => &[
            F::LikeCount,
            F::FavoriteCount,
            F::DownvoteCount,
            F::CommentCount,
            F::ShareCount,
        ],
        TargetType::Dynamic => &[F::LikeCount, F::FavoriteCount, F::CommentCount, F::ShareCount],
        TargetType::Comment => &[F::LikeCount, F::ReplyCount],
        TargetType::User => &[F::FollowersCount, F::FollowingCount],
    }
}

/// Reject a column that the target table does not carry.
pub fn ensure_field(target_type: TargetType, field: CounterField) -> Result<(), CoreError> {
    if counter_fields(target_type).contains(&field) {
        Ok(())
    } else {
        Err(CoreError::InvalidOperation(format!(
            "target type '{target_type}' has no counter '{field}'"
        )))
    }
}

/// Targets that accept comments.
pub fn ensure_commentable(target_type: TargetType) -> Result<(), CoreError> {
    match target_type {
        TargetType::Content | TargetType::Dynamic => Ok(()),
        other => Err(CoreError::InvalidOperation(format!(
            "target type '{other}' does not accept comments"
        ))),
    }
}

/// `reply_count` of a parent comment, adjusted when a reply comes and goes.
pub const REPLY_BINDING: CounterBinding =
    CounterBinding::target(TargetType::Comment, CounterField::ReplyCount);

/// `comment_count` of the commented target.
pub fn comment_binding(target_type: TargetType) -> Result<CounterBinding, CoreError> {
    ensure_commentable(target_type)?;
    Ok(CounterBinding::target(target_type, CounterField::CommentCount))
}

/// Targets that can be shared.
pub fn ensure_shareable(target_type: TargetType) -> Result<(), CoreError> {
    ensure_field(target_type, CounterField::ShareCount)
}

/// Authoritative records a counter column is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterSource {
    /// Active interactions of `kind` on `target_type`, matched on the
    /// target id or the actor id depending on `subject`.
    Interactions {
        kind: InteractionKind,
        target_type: TargetType,
        subject: CounterSubject,
    },
    /// Active comments on the target.
    Comments,
    /// Active replies to the comment.
    Replies,
}

const ALL_KINDS: [InteractionKind; 4] = [
    InteractionKind::Like,
    InteractionKind::Follow,
    InteractionKind::Favorite,
    InteractionKind::Downvote,
];

const ALL_TARGET_TYPES: [TargetType; 4] = [
    TargetType::Content,
    TargetType::Dynamic,
    TargetType::Comment,
    TargetType::User,
];

/// Where `field` on `table_type` gets its value from.
///
/// `None` for counters with no backing records (`share_count`).
pub fn counter_source(table_type: TargetType, field: CounterField) -> Option<CounterSource> {
    match field {
        CounterField::CommentCount => return Some(CounterSource::Comments),
        CounterField::ReplyCount => return Some(CounterSource::Replies),
        CounterField::ShareCount => return None,
        _ => {}
    }

    for kind in ALL_KINDS {
        for target_type in ALL_TARGET_TYPES {
            let Ok(bindings) = bindings_for(kind, target_type) else {
                continue;
            };
            if let Some(b) = bindings
                .iter()
                .find(|b| b.table_type == table_type && b.field == field)
            {
                return Some(CounterSource::Interactions {
                    kind,
                    target_type,
                    subject: b.subject,
                });
            }
        }
    }
    None
}

//! Interaction kinds, target types, and status transition rules.
//!
//! An interaction record captures one actor's like / follow / favorite /
//! downvote of one target. Its `status` flips between `active` and
//! `inactive` on every toggle; the row itself is never deleted.
//!
//! All string values here must match the `CHECK` constraints in
//! `20261001000002_create_interactions.sql`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const KIND_LIKE: &str = "like";
pub const KIND_FOLLOW: &str = "follow";
pub const KIND_FAVORITE: &str = "favorite";
pub const KIND_DOWNVOTE: &str = "downvote";

pub const VALID_KINDS: &[&str] = &[KIND_LIKE, KIND_FOLLOW, KIND_FAVORITE, KIND_DOWNVOTE];

pub const TARGET_CONTENT: &str = "content";
pub const TARGET_DYNAMIC: &str = "dynamic";
pub const TARGET_COMMENT: &str = "comment";
pub const TARGET_USER: &str = "user";

pub const VALID_TARGET_TYPES: &[&str] =
    &[TARGET_CONTENT, TARGET_DYNAMIC, TARGET_COMMENT, TARGET_USER];

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";

// ---------------------------------------------------------------------------
// InteractionKind
// ---------------------------------------------------------------------------

/// What an actor did to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Like,
    Follow,
    Favorite,
    Downvote,
}

impl InteractionKind {
    /// Convert from a database or path string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            KIND_LIKE => Ok(Self::Like),
            KIND_FOLLOW => Ok(Self::Follow),
            KIND_FAVORITE => Ok(Self::Favorite),
            KIND_DOWNVOTE => Ok(Self::Downvote),
            _ => Err(CoreError::InvalidOperation(format!(
                "Unknown interaction kind '{s}'. Must be one of: {}",
                VALID_KINDS.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => KIND_LIKE,
            Self::Follow => KIND_FOLLOW,
            Self::Favorite => KIND_FAVORITE,
            Self::Downvote => KIND_DOWNVOTE,
        }
    }

    /// Human-readable outcome of a write that left the record in `status`.
    pub fn outcome_message(&self, status: InteractionStatus) -> &'static str {
        match (self, status) {
            (Self::Like, InteractionStatus::Active) => "liked",
            (Self::Like, InteractionStatus::Inactive) => "unliked",
            (Self::Follow, InteractionStatus::Active) => "followed",
            (Self::Follow, InteractionStatus::Inactive) => "unfollowed",
            (Self::Favorite, InteractionStatus::Active) => "favorited",
            (Self::Favorite, InteractionStatus::Inactive) => "unfavorited",
            (Self::Downvote, InteractionStatus::Active) => "downvoted",
            (Self::Downvote, InteractionStatus::Inactive) => "downvote removed",
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for InteractionKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_value(&value)
    }
}

// ---------------------------------------------------------------------------
// TargetType
// ---------------------------------------------------------------------------

/// The kind of entity an interaction points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Content,
    Dynamic,
    Comment,
    User,
}

impl TargetType {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            TARGET_CONTENT => Ok(Self::Content),
            TARGET_DYNAMIC => Ok(Self::Dynamic),
            TARGET_COMMENT => Ok(Self::Comment),
            TARGET_USER => Ok(Self::User),
            _ => Err(CoreError::InvalidOperation(format!(
                "Unknown target type '{s}'. Must be one of: {}",
                VALID_TARGET_TYPES.join(", ")
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => TARGET_CONTENT,
            Self::Dynamic => TARGET_DYNAMIC,
            Self::Comment => TARGET_COMMENT,
            Self::User => TARGET_USER,
        }
    }

    /// Table owning rows of this target type.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Content => "contents",
            Self::Dynamic => "dynamics",
            Self::Comment => "comments",
            Self::User => "users",
        }
    }

    /// Entity name used in `NotFound` errors.
    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::Content => "Content",
            Self::Dynamic => "Dynamic",
            Self::Comment => "Comment",
            Self::User => "User",
        }
    }

    /// Build the `NotFound` error for a missing target of this type.
    pub fn not_found(&self, id: DbId) -> CoreError {
        CoreError::NotFound {
            entity: self.entity_name(),
            id,
        }
    }
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for TargetType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_value(&value)
    }
}

// ---------------------------------------------------------------------------
// InteractionStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionStatus {
    Active,
    Inactive,
}

impl InteractionStatus {
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_ACTIVE => Ok(Self::Active),
            STATUS_INACTIVE => Ok(Self::Inactive),
            _ => Err(CoreError::Validation(format!(
                "Invalid interaction status '{s}'. Must be one of: {STATUS_ACTIVE}, {STATUS_INACTIVE}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Inactive => STATUS_INACTIVE,
        }
    }

    /// The status a toggle moves to.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for InteractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for InteractionStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_value(&value)
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// A real change of status. Counters move only on one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// inactive -> active (including first creation).
    Activated,
    /// active -> inactive.
    Deactivated,
}

impl StatusTransition {
    /// Compare the stored status with the status about to be written.
    ///
    /// Returns `None` for a no-op write.
    pub fn between(old: InteractionStatus, new: InteractionStatus) -> Option<Self> {
        match (old, new) {
            (InteractionStatus::Inactive, InteractionStatus::Active) => Some(Self::Activated),
            (InteractionStatus::Active, InteractionStatus::Inactive) => Some(Self::Deactivated),
            _ => None,
        }
    }

    /// Signed counter delta for this transition.
    pub fn delta(&self) -> i64 {
        match self {
            Self::Activated => 1,
            Self::Deactivated => -1,
        }
    }
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

/// Reject ids that cannot name a stored row.
pub fn validate_target_id(target_id: DbId) -> Result<(), CoreError> {
    if target_id <= 0 {
        return Err(CoreError::InvalidOperation(format!(
            "target id must be a positive integer, got {target_id}"
        )));
    }
    Ok(())
}

/// Users cannot follow themselves.
pub fn ensure_not_self_target(
    kind: InteractionKind,
    target_type: TargetType,
    actor_id: DbId,
    target_id: DbId,
) -> Result<(), CoreError> {
    if kind == InteractionKind::Follow && target_type == TargetType::User && actor_id == target_id
    {
        return Err(CoreError::InvalidOperation(
            "cannot follow yourself".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn kind_string_values_roundtrip() {
        for s in VALID_KINDS {
            let kind = InteractionKind::from_str_value(s).unwrap();
            assert_eq!(kind.as_str(), *s);
        }
    }

    #[test]
    fn unknown_kind_is_invalid_operation() {
        assert_matches!(
            InteractionKind::from_str_value("share"),
            Err(CoreError::InvalidOperation(msg)) if msg.contains("share")
        );
    }

    #[test]
    fn target_type_maps_to_table() {
        assert_eq!(TargetType::Content.table(), "contents");
        assert_eq!(TargetType::Dynamic.table(), "dynamics");
        assert_eq!(TargetType::Comment.table(), "comments");
        assert_eq!(TargetType::User.table(), "users");
    }

    #[test]
    fn unknown_target_type_is_invalid_operation() {
        assert_matches!(
            TargetType::from_str_value("post"),
            Err(CoreError::InvalidOperation(_))
        );
    }

    #[test]
    fn not_found_names_entity() {
        assert_matches!(
            TargetType::Content.not_found(42),
            CoreError::NotFound { entity: "Content", id: 42 }
        );
    }

    #[test]
    fn toggled_flips_status() {
        assert_eq!(InteractionStatus::Active.toggled(), InteractionStatus::Inactive);
        assert_eq!(InteractionStatus::Inactive.toggled(), InteractionStatus::Active);
        assert_eq!(
            InteractionStatus::Active.toggled().toggled(),
            InteractionStatus::Active
        );
    }

    #[test]
    fn transition_detects_real_changes_only() {
        use InteractionStatus::*;
        assert_eq!(
            StatusTransition::between(Inactive, Active),
            Some(StatusTransition::Activated)
        );
        assert_eq!(
            StatusTransition::between(Active, Inactive),
            Some(StatusTransition::Deactivated)
        );
        assert_eq!(StatusTransition::between(Active, Active), None);
        assert_eq!(StatusTransition::between(Inactive, Inactive), None);
    }

    #[test]
    fn transition_deltas() {
        assert_eq!(StatusTransition::Activated.delta(), 1);
        assert_eq!(StatusTransition::Deactivated.delta(), -1);
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(
            InteractionKind::Like.outcome_message(InteractionStatus::Active),
            "liked"
        );
        assert_eq!(
            InteractionKind::Like.outcome_message(InteractionStatus::Inactive),
            "unliked"
        );
        assert_eq!(
            InteractionKind::Follow.outcome_message(InteractionStatus::Inactive),
            "unfollowed"
        );
    }

    #[test]
    fn non_positive_target_id_rejected() {
        assert!(validate_target_id(1).is_ok());
        assert_matches!(validate_target_id(0), Err(CoreError::InvalidOperation(_)));
        assert_matches!(validate_target_id(-7), Err(CoreError::InvalidOperation(_)));
    }

    #[test]
    fn self_follow_rejected() {
        assert_matches!(
            ensure_not_self_target(InteractionKind::Follow, TargetType::User, 5, 5),
            Err(CoreError::InvalidOperation(_))
        );
        assert!(ensure_not_self_target(InteractionKind::Follow, TargetType::User, 5, 9).is_ok());
        // Liking your own content is allowed.
        assert!(ensure_not_self_target(InteractionKind::Like, TargetType::Content, 5, 5).is_ok());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&InteractionKind::Downvote).unwrap();
        assert_eq!(json, "\"downvote\"");
        let parsed: TargetType = serde_json::from_str("\"dynamic\"").unwrap();
        assert_eq!(parsed, TargetType::Dynamic);
    }
}

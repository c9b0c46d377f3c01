//! Repository for the `interactions` table.
//!
//! Every write that changes a record's status runs in one transaction with
//! the matching counter updates ([`CounterRepo::apply_transition`]). The
//! record row is locked with `FOR UPDATE` before its status is read, so
//! concurrent toggles on the same tuple serialize instead of racing.

use kudos_core::counter::CounterBinding;
use kudos_core::interaction::{
    InteractionKind, InteractionStatus, StatusTransition, TargetType, STATUS_ACTIVE,
};
use kudos_core::pagination::PageRequest;
use kudos_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::interaction::{InteractionKey, InteractionRecord, InteractionWrite};
use crate::repositories::CounterRepo;

/// Column list for `interactions` queries.
const COLUMNS: &str = "\
    id, actor_id, kind, target_type, target_id, status, created_at, updated_at";

/// Record store for likes, follows, favorites, and downvotes.
pub struct InteractionRepo;

impl InteractionRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Return the record for `key`, inserting an active one if none exists.
    ///
    /// Insertion counts as an activation and updates `bindings` in the same
    /// transaction.
    pub async fn get_or_create(
        pool: &PgPool,
        key: InteractionKey,
        bindings: &[CounterBinding],
    ) -> Result<InteractionWrite, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let write = match Self::insert_active(&mut tx, key).await? {
            Some(record) => {
                CounterRepo::apply_transition(
                    &mut tx,
                    bindings,
                    key.actor_id,
                    key.target_id,
                    StatusTransition::Activated,
                )
                .await?;
                InteractionWrite {
                    record,
                    created: true,
                    transition: Some(StatusTransition::Activated),
                }
            }
            None => InteractionWrite {
                record: Self::find_inner(&mut tx, key, false).await?,
                created: false,
                transition: None,
            },
        };

        tx.commit().await?;
        Ok(write)
    }

    /// Flip the status of the record for `key`, creating it (active) on the
    /// first call.
    ///
    /// The caller validates that the target exists before toggling.
    pub async fn toggle(
        pool: &PgPool,
        key: InteractionKey,
        bindings: &[CounterBinding],
    ) -> Result<InteractionWrite, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if let Some(record) = Self::insert_active(&mut tx, key).await? {
            CounterRepo::apply_transition(
                &mut tx,
                bindings,
                key.actor_id,
                key.target_id,
                StatusTransition::Activated,
            )
            .await?;
            tx.commit().await?;
            return Ok(InteractionWrite {
                record,
                created: true,
                transition: Some(StatusTransition::Activated),
            });
        }

        let current = Self::find_inner(&mut tx, key, true).await?;
        let next = current.status.toggled();
        let write = Self::write_status(&mut tx, current, next, bindings).await?;

        tx.commit().await?;
        Ok(write)
    }

    /// Move the record for `key` to `status`.
    ///
    /// A write that does not change the status leaves counters untouched.
    /// Returns `None` if no record exists for `key`.
    pub async fn set_status(
        pool: &PgPool,
        key: InteractionKey,
        status: InteractionStatus,
        bindings: &[CounterBinding],
    ) -> Result<Option<InteractionWrite>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM interactions \
             WHERE actor_id = $1 AND kind = $2 AND target_type = $3 AND target_id = $4 \
             FOR UPDATE"
        );
        let current = sqlx::query_as::<_, InteractionRecord>(&query)
            .bind(key.actor_id)
            .bind(key.kind.as_str())
            .bind(key.target_type.as_str())
            .bind(key.target_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let write = Self::write_status(&mut tx, current, status, bindings).await?;
        tx.commit().await?;
        Ok(Some(write))
    }

    /// Insert an active record. `None` if the tuple already exists.
    async fn insert_active(
        tx: &mut Transaction<'_, Postgres>,
        key: InteractionKey,
    ) -> Result<Option<InteractionRecord>, sqlx::Error> {
        let query = format!(
            "INSERT INTO interactions (actor_id, kind, target_type, target_id, status) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_interactions_tuple DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InteractionRecord>(&query)
            .bind(key.actor_id)
            .bind(key.kind.as_str())
            .bind(key.target_type.as_str())
            .bind(key.target_id)
            .bind(STATUS_ACTIVE)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch the record for `key` inside a transaction, optionally locking it.
    async fn find_inner(
        tx: &mut Transaction<'_, Postgres>,
        key: InteractionKey,
        for_update: bool,
    ) -> Result<InteractionRecord, sqlx::Error> {
        let lock = if for_update { " FOR UPDATE" } else { "" };
        let query = format!(
            "SELECT {COLUMNS} FROM interactions \
             WHERE actor_id = $1 AND kind = $2 AND target_type = $3 AND target_id = $4{lock}"
        );
        sqlx::query_as::<_, InteractionRecord>(&query)
            .bind(key.actor_id)
            .bind(key.kind.as_str())
            .bind(key.target_type.as_str())
            .bind(key.target_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Persist `next` on a locked record and sync counters on a real change.
    async fn write_status(
        tx: &mut Transaction<'_, Postgres>,
        current: InteractionRecord,
        next: InteractionStatus,
        bindings: &[CounterBinding],
    ) -> Result<InteractionWrite, sqlx::Error> {
        let Some(transition) = StatusTransition::between(current.status, next) else {
            return Ok(InteractionWrite {
                record: current,
                created: false,
                transition: None,
            });
        };

        let query = format!(
            "UPDATE interactions SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, InteractionRecord>(&query)
            .bind(current.id)
            .bind(next.as_str())
            .fetch_one(&mut **tx)
            .await?;

        CounterRepo::apply_transition(
            tx,
            bindings,
            record.actor_id,
            record.target_id,
            transition,
        )
        .await?;

        Ok(InteractionWrite {
            record,
            created: false,
            transition: Some(transition),
        })
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find the record for `key`.
    pub async fn find(
        pool: &PgPool,
        key: InteractionKey,
    ) -> Result<Option<InteractionRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interactions \
             WHERE actor_id = $1 AND kind = $2 AND target_type = $3 AND target_id = $4"
        );
        sqlx::query_as::<_, InteractionRecord>(&query)
            .bind(key.actor_id)
            .bind(key.kind.as_str())
            .bind(key.target_type.as_str())
            .bind(key.target_id)
            .fetch_optional(pool)
            .await
    }

    /// One page of an actor's records of one kind, newest first.
    ///
    /// Returns the page and the total number of matching records.
    pub async fn list_for_actor(
        pool: &PgPool,
        actor_id: DbId,
        kind: InteractionKind,
        target_type: TargetType,
        status: Option<InteractionStatus>,
        page: PageRequest,
    ) -> Result<(Vec<InteractionRecord>, i64), sqlx::Error> {
        let status = status.map(|s| s.as_str());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM interactions \
             WHERE actor_id = $1 AND kind = $2 AND target_type = $3 \
               AND ($4::TEXT IS NULL OR status = $4)",
        )
        .bind(actor_id)
        .bind(kind.as_str())
        .bind(target_type.as_str())
        .bind(status)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM interactions \
             WHERE actor_id = $1 AND kind = $2 AND target_type = $3 \
               AND ($4::TEXT IS NULL OR status = $4) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $5 OFFSET $6"
        );
        let records = sqlx::query_as::<_, InteractionRecord>(&query)
            .bind(actor_id)
            .bind(kind.as_str())
            .bind(target_type.as_str())
            .bind(status)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok((records, total))
    }

    /// Ids of the targets an actor currently has an active interaction with.
    pub async fn active_target_ids(
        pool: &PgPool,
        actor_id: DbId,
        kind: InteractionKind,
        target_type: TargetType,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT target_id FROM interactions \
             WHERE actor_id = $1 AND kind = $2 AND target_type = $3 AND status = $4 \
             ORDER BY target_id",
        )
        .bind(actor_id)
        .bind(kind.as_str())
        .bind(target_type.as_str())
        .bind(STATUS_ACTIVE)
        .fetch_all(pool)
        .await
    }

    /// The subset of `target_ids` the actor has an active interaction with.
    pub async fn active_among(
        pool: &PgPool,
        actor_id: DbId,
        kind: InteractionKind,
        target_type: TargetType,
        target_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar(
            "SELECT target_id FROM interactions \
             WHERE actor_id = $1 AND kind = $2 AND target_type = $3 AND status = $4 \
               AND target_id = ANY($5)",
        )
        .bind(actor_id)
        .bind(kind.as_str())
        .bind(target_type.as_str())
        .bind(STATUS_ACTIVE)
        .bind(target_ids)
        .fetch_all(pool)
        .await
    }

    /// Number of active records pointing at one target.
    pub async fn count_active(
        pool: &PgPool,
        kind: InteractionKind,
        target_type: TargetType,
        target_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM interactions \
             WHERE kind = $1 AND target_type = $2 AND target_id = $3 AND status = $4",
        )
        .bind(kind.as_str())
        .bind(target_type.as_str())
        .bind(target_id)
        .bind(STATUS_ACTIVE)
        .fetch_one(pool)
        .await
    }

    /// One page of follow records, filtered by either side.
    pub async fn list_follows(
        pool: &PgPool,
        follower_id: Option<DbId>,
        followee_id: Option<DbId>,
        status: InteractionStatus,
        page: PageRequest,
    ) -> Result<(Vec<InteractionRecord>, i64), sqlx::Error> {
        let kind = InteractionKind::Follow.as_str();
        let target_type = TargetType::User.as_str();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM interactions \
             WHERE kind = $1 AND target_type = $2 AND status = $3 \
               AND ($4::BIGINT IS NULL OR actor_id = $4) \
               AND ($5::BIGINT IS NULL OR target_id = $5)",
        )
        .bind(kind)
        .bind(target_type)
        .bind(status.as_str())
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(pool)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM interactions \
             WHERE kind = $1 AND target_type = $2 AND status = $3 \
               AND ($4::BIGINT IS NULL OR actor_id = $4) \
               AND ($5::BIGINT IS NULL OR target_id = $5) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $6 OFFSET $7"
        );
        let records = sqlx::query_as::<_, InteractionRecord>(&query)
            .bind(kind)
            .bind(target_type)
            .bind(status.as_str())
            .bind(follower_id)
            .bind(followee_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok((records, total))
    }
}

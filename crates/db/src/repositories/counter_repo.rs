//! Counter synchronizer for denormalized `*_count` columns.
//!
//! All writes are single-statement atomic updates (`SET c = c + 1`), so
//! concurrent interactions on the same target never lose an increment.
//! Decrements clamp at zero. Table and column names come from the static
//! binding table in `kudos_core::counter`, never from user input.

use std::collections::BTreeMap;

use kudos_core::counter::{
    counter_fields, counter_source, CounterBinding, CounterField, CounterSource, CounterSubject,
};
use kudos_core::interaction::{StatusTransition, TargetType, STATUS_ACTIVE};
use kudos_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::target::TargetCounters;

/// Atomic counter maintenance and counter reads.
pub struct CounterRepo;

impl CounterRepo {
    // -----------------------------------------------------------------------
    // Synchronizer writes
    // -----------------------------------------------------------------------

    /// Increment `binding`'s column on row `subject_id`.
    ///
    /// Returns the new value, or `None` if the row does not exist.
    pub async fn on_activate(
        tx: &mut Transaction<'_, Postgres>,
        binding: &CounterBinding,
        subject_id: DbId,
    ) -> Result<Option<i64>, sqlx::Error> {
        let table = binding.table_type.table();
        let column = binding.field.column();
        let query = format!(
            "UPDATE {table} SET {column} = {column} + 1 WHERE id = $1 RETURNING {column}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(subject_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Decrement `binding`'s column on row `subject_id`, never below zero.
    ///
    /// Returns the new value, or `None` if the row does not exist.
    pub async fn on_deactivate(
        tx: &mut Transaction<'_, Postgres>,
        binding: &CounterBinding,
        subject_id: DbId,
    ) -> Result<Option<i64>, sqlx::Error> {
        let table = binding.table_type.table();
        let column = binding.field.column();
        let query = format!(
            "UPDATE {table} SET {column} = GREATEST({column} - 1, 0) WHERE id = $1 \
             RETURNING {column}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(subject_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Apply one status transition to every bound counter.
    ///
    /// Must run in the same transaction as the record write. Rows are
    /// updated in `(table, id)` order so two follows in opposite directions
    /// lock the user rows in the same order.
    pub async fn apply_transition(
        tx: &mut Transaction<'_, Postgres>,
        bindings: &[CounterBinding],
        actor_id: DbId,
        target_id: DbId,
        transition: StatusTransition,
    ) -> Result<(), sqlx::Error> {
        let mut ordered: Vec<(&CounterBinding, DbId)> = bindings
            .iter()
            .map(|b| (b, b.subject_id(actor_id, target_id)))
            .collect();
        ordered.sort_by_key(|(b, id)| (b.table_type.table(), *id));

        for (binding, subject_id) in ordered {
            let updated = match transition {
                StatusTransition::Activated => Self::on_activate(tx, binding, subject_id).await?,
                StatusTransition::Deactivated => {
                    Self::on_deactivate(tx, binding, subject_id).await?
                }
            };
            if updated.is_none() {
                tracing::warn!(
                    table = binding.table_type.table(),
                    column = binding.field.column(),
                    subject_id,
                    "Counter row missing, adjustment skipped"
                );
            }
        }
        Ok(())
    }

    /// Atomically add one share. Returns the new `share_count`.
    pub async fn increment_share(
        pool: &PgPool,
        target_type: TargetType,
        target_id: DbId,
    ) -> Result<Option<i64>, sqlx::Error> {
        let table = target_type.table();
        let query = format!(
            "UPDATE {table} SET share_count = share_count + 1 WHERE id = $1 \
             RETURNING share_count"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(target_id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Current value of one counter column. `None` if the row does not exist.
    ///
    /// The caller must ensure `field` belongs to `target_type`
    /// (`kudos_core::counter::ensure_field`).
    pub async fn get_counter(
        pool: &PgPool,
        target_type: TargetType,
        target_id: DbId,
        field: CounterField,
    ) -> Result<Option<i64>, sqlx::Error> {
        let table = target_type.table();
        let column = field.column();
        let query = format!("SELECT {column} FROM {table} WHERE id = $1");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(target_id)
            .fetch_optional(pool)
            .await
    }

    /// Every counter column of a target row. `None` if the row does not exist.
    pub async fn counters(
        pool: &PgPool,
        target_type: TargetType,
        target_id: DbId,
    ) -> Result<Option<TargetCounters>, sqlx::Error> {
        let fields = counter_fields(target_type);
        let columns = fields
            .iter()
            .map(|f| f.column())
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT ARRAY[{columns}]::BIGINT[] FROM {} WHERE id = $1",
            target_type.table()
        );
        let values: Option<Vec<i64>> = sqlx::query_scalar(&query)
            .bind(target_id)
            .fetch_optional(pool)
            .await?;

        Ok(values.map(|values| TargetCounters {
            target_type,
            target_id,
            counters: fields.iter().copied().zip(values).collect(),
        }))
    }

    // -----------------------------------------------------------------------
    // Repair
    // -----------------------------------------------------------------------

    /// Recompute every record-backed counter of a target from the
    /// authoritative rows and persist the result.
    ///
    /// The target row is locked for the duration so concurrent toggles wait.
    /// Counters without backing records (`share_count`) are left as-is.
    /// Returns `None` if the target does not exist.
    pub async fn recount(
        pool: &PgPool,
        target_type: TargetType,
        target_id: DbId,
    ) -> Result<Option<TargetCounters>, sqlx::Error> {
        let table = target_type.table();
        let mut tx = pool.begin().await?;

        let lock_query = format!("SELECT id FROM {table} WHERE id = $1 FOR UPDATE");
        let locked: Option<DbId> = sqlx::query_scalar(&lock_query)
            .bind(target_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let mut counters = BTreeMap::new();
        for &field in counter_fields(target_type) {
            let column = field.column();
            let value = match counter_source(target_type, field) {
                Some(source) => {
                    let count = Self::count_source(&mut tx, target_type, source, target_id).await?;
                    let update = format!("UPDATE {table} SET {column} = $2 WHERE id = $1");
                    sqlx::query(&update)
                        .bind(target_id)
                        .bind(count)
                        .execute(&mut *tx)
                        .await?;
                    count
                }
                None => {
                    let select = format!("SELECT {column} FROM {table} WHERE id = $1");
                    sqlx::query_scalar::<_, i64>(&select)
                        .bind(target_id)
                        .fetch_one(&mut *tx)
                        .await?
                }
            };
            counters.insert(field, value);
        }

        tx.commit().await?;

        Ok(Some(TargetCounters {
            target_type,
            target_id,
            counters,
        }))
    }

    /// Count the active records behind one counter.
    async fn count_source(
        tx: &mut Transaction<'_, Postgres>,
        table_type: TargetType,
        source: CounterSource,
        id: DbId,
    ) -> Result<i64, sqlx::Error> {
        match source {
            CounterSource::Interactions {
                kind,
                target_type,
                subject,
            } => {
                let id_column = match subject {
                    CounterSubject::Target => "target_id",
                    CounterSubject::Actor => "actor_id",
                };
                let query = format!(
                    "SELECT COUNT(*) FROM interactions \
                     WHERE kind = $1 AND target_type = $2 AND {id_column} = $3 AND status = $4"
                );
                sqlx::query_scalar::<_, i64>(&query)
                    .bind(kind.as_str())
                    .bind(target_type.as_str())
                    .bind(id)
                    .bind(STATUS_ACTIVE)
                    .fetch_one(&mut **tx)
                    .await
            }
            CounterSource::Comments => {
                // Replies count towards the target's comment_count too.
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM comments \
                     WHERE target_type = $1 AND target_id = $2 AND status = $3",
                )
                .bind(table_type.as_str())
                .bind(id)
                .bind(STATUS_ACTIVE)
                .fetch_one(&mut **tx)
                .await
            }
            CounterSource::Replies => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM comments WHERE parent_comment_id = $1 AND status = $2",
                )
                .bind(id)
                .bind(STATUS_ACTIVE)
                .fetch_one(&mut **tx)
                .await
            }
        }
    }
}

//! Existence lookups for interaction targets.

use kudos_core::interaction::{TargetType, STATUS_ACTIVE};
use kudos_core::types::DbId;
use sqlx::PgPool;

/// Read-only access to target entities owned by other modules.
pub struct TargetRepo;

impl TargetRepo {
    /// Whether a target row exists. Soft-deleted comments do not count.
    pub async fn exists(
        pool: &PgPool,
        target_type: TargetType,
        target_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let table = target_type.table();
        let query = match target_type {
            TargetType::Comment => format!(
                "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1 AND status = '{STATUS_ACTIVE}')"
            ),
            _ => format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)"),
        };
        sqlx::query_scalar::<_, bool>(&query)
            .bind(target_id)
            .fetch_one(pool)
            .await
    }
}

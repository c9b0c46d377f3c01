//! Counter snapshots of target entities.

use std::collections::BTreeMap;

use kudos_core::counter::CounterField;
use kudos_core::interaction::TargetType;
use kudos_core::types::DbId;
use serde::Serialize;

/// Every counter column of one target row.
#[derive(Debug, Clone, Serialize)]
pub struct TargetCounters {
    pub target_type: TargetType,
    pub target_id: DbId,
    pub counters: BTreeMap<CounterField, i64>,
}

impl TargetCounters {
    pub fn get(&self, field: CounterField) -> Option<i64> {
        self.counters.get(&field).copied()
    }
}

//! Aggregate statistics over the node table.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of graph population and freshness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphStats {
    /// Total node count across all scopes and types.
    pub total_nodes: u64,
    /// Node count per type.
    pub nodes_by_type: BTreeMap<String, u64>,
    /// Node count per scope.
    pub nodes_by_scope: BTreeMap<String, u64>,
    /// Nodes written in the last 24 hours.
    pub recent_nodes_24h: u64,
    /// Earliest `updated_at` on record.
    pub oldest_node_date: Option<DateTime<Utc>>,
    /// Latest `updated_at` on record.
    pub newest_node_date: Option<DateTime<Utc>>,
}

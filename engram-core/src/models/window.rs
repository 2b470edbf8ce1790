//! Storage-level window query and sampling order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Scope;

/// Row ordering for window queries.
///
/// Injectable so timeline sampling can run randomized in production
/// while tests supply a deterministic order and assert exact bucket
/// composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleOrder {
    /// `updated_at` descending.
    Newest,
    /// `updated_at` ascending.
    Oldest,
    /// SQLite `RANDOM()` ordering.
    Random,
}

impl SampleOrder {
    /// ORDER BY clause body for this ordering.
    pub fn sql_clause(&self) -> &'static str {
        match self {
            SampleOrder::Newest => "updated_at DESC",
            SampleOrder::Oldest => "updated_at ASC",
            SampleOrder::Random => "RANDOM()",
        }
    }
}

impl Default for SampleOrder {
    fn default() -> Self {
        SampleOrder::Random
    }
}

/// Fully-resolved query over the node table for one time window.
///
/// The window is half-open: `updated_at >= start AND updated_at < end`.
/// Metric time-series rows are always excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub scope: Option<Scope>,
    pub node_type: Option<String>,
    pub order: SampleOrder,
    pub limit: usize,
    pub offset: usize,
}

impl WindowQuery {
    /// Window query with no filters, newest first.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, limit: usize) -> Self {
        Self {
            start,
            end,
            scope: None,
            node_type: None,
            order: SampleOrder::Newest,
            limit,
            offset: 0,
        }
    }
}

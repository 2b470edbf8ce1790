//! Timeline request/response types and bucket granularity.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{GraphEdge, GraphNode, Scope};

/// Histogram bucket width for timeline responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketSize {
    Hour,
    Day,
}

impl BucketSize {
    /// Label format for bucket keys. Lexicographic order on labels is
    /// chronological order.
    pub fn label_format(&self) -> &'static str {
        match self {
            BucketSize::Hour => "%Y-%m-%d %H:00",
            BucketSize::Day => "%Y-%m-%d",
        }
    }

    /// Bucket label for a timestamp, e.g. "2024-01-01 00:00".
    pub fn label(&self, at: DateTime<Utc>) -> String {
        at.format(self.label_format()).to_string()
    }

    /// Width of one bucket.
    pub fn step(&self) -> Duration {
        match self {
            BucketSize::Hour => Duration::hours(1),
            BucketSize::Day => Duration::days(1),
        }
    }
}

/// Request for a bounded, time-representative sample of recent nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineRequest {
    /// Lookback window in hours, 1..=168. Defaults to 24.
    pub hours: Option<u32>,
    /// Bucket granularity. Defaults to hour for windows up to 48 hours,
    /// day beyond that.
    pub bucket_size: Option<BucketSize>,
    /// Scope filter.
    pub scope: Option<Scope>,
    /// Node type filter.
    pub node_type: Option<String>,
    /// Result cap.
    pub limit: Option<usize>,
    /// Also return edges touching the returned nodes.
    pub include_edges: bool,
    /// Report an exact full-window `total` via a dedicated count query
    /// instead of the size of the sampled set.
    pub exact_total: bool,
}

impl TimelineRequest {
    /// Granularity resolved against the requested window.
    pub fn resolved_bucket_size(&self, hours: u32) -> BucketSize {
        self.bucket_size.unwrap_or(if hours <= 48 {
            BucketSize::Hour
        } else {
            BucketSize::Day
        })
    }
}

/// Timeline query response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResponse {
    /// Sampled nodes, newest first, at most `limit` entries.
    pub memories: Vec<GraphNode>,
    /// Edges touching the returned nodes, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<GraphEdge>>,
    /// Bucket label to node count, one entry per bucket boundary in the
    /// window. Counts reflect the sampled set, not the full table.
    pub buckets: BTreeMap<String, u64>,
    /// Window start.
    pub start_time: DateTime<Utc>,
    /// Window end.
    pub end_time: DateTime<Utc>,
    /// Sampled population before truncation to `limit`, or the exact
    /// full-window count when `exact_total` was requested.
    pub total: usize,
}

//! Client-side time filtering for result sets that did not come from a
//! SQL window scan.

use chrono::{DateTime, Utc};

use engram_core::models::GraphNode;

/// Keep nodes whose resolved time falls in the half-open window
/// `[since, until)`. Missing bounds widen to the epoch and now.
/// Nodes with no resolvable time are dropped.
pub fn apply_time_window(
    nodes: Vec<GraphNode>,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> Vec<GraphNode> {
    let start = since.unwrap_or(DateTime::UNIX_EPOCH);
    let end = until.unwrap_or_else(Utc::now);

    nodes
        .into_iter()
        .filter(|node| match node.resolved_time() {
            Some(t) => t >= start && t < end,
            None => false,
        })
        .collect()
}

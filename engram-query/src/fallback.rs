//! Degraded read path: when a direct window scan fails, fetch through
//! the search collaborator and filter by time client-side.

use chrono::{DateTime, Utc};

use engram_core::models::{GraphNode, Scope, SearchFilter};
use engram_core::EngramResult;

use crate::filters;
use crate::router::QueryDeps;

/// Fetch candidates via an empty-text search and keep those inside
/// `[start, end)`.
///
/// The candidate fetch is capped by `fallback_fetch_limit`, so results
/// can undercount large windows. The search collaborator scopes to
/// `local` when no scope is given, unlike the direct path which scans
/// every scope. An error here is terminal: both paths have failed.
pub fn fetch_window_via_search(
    deps: &QueryDeps<'_>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    scope: Option<Scope>,
    node_type: Option<&str>,
) -> EngramResult<Vec<GraphNode>> {
    let filter = SearchFilter {
        scope,
        node_type: node_type.map(str::to_string),
        tags: Vec::new(),
        limit: deps.config.fallback_fetch_limit,
    };

    let candidates = deps.source.search("", &filter)?;
    Ok(filters::apply_time_window(
        candidates,
        Some(start),
        Some(end),
    ))
}

//! Time-range scan over `updated_at` with a search fallback.

use chrono::{DateTime, Utc};
use tracing::warn;

use engram_core::models::{GraphNode, MemoryQuery, SampleOrder, WindowQuery};
use engram_core::EngramResult;
use engram_storage::queries::window_ops;

use super::QueryDeps;
use crate::fallback;

/// Scan the half-open window `[since, until)` directly. A missing
/// `since` widens to the epoch, a missing `until` to now. When the
/// scan fails the degraded search path takes over with the same
/// ordering and paging applied client-side.
pub fn execute_time_range(
    deps: &QueryDeps<'_>,
    request: &MemoryQuery,
) -> EngramResult<Vec<GraphNode>> {
    let start = request.since.unwrap_or(DateTime::UNIX_EPOCH);
    let end = request.until.unwrap_or_else(Utc::now);
    let limit = request.limit.unwrap_or(deps.config.default_search_limit);

    let window = WindowQuery {
        start,
        end,
        scope: request.scope,
        node_type: request.node_type.clone(),
        order: SampleOrder::Newest,
        limit,
        offset: request.offset,
    };

    let direct = deps
        .readers
        .with_conn(|conn| window_ops::get_nodes_in_window(conn, &window));

    match direct {
        Ok(nodes) => Ok(nodes),
        Err(e) => {
            warn!(error = %e, "window scan failed, using search fallback");
            let mut nodes = fallback::fetch_window_via_search(
                deps,
                start,
                end,
                request.scope,
                request.node_type.as_deref(),
            )?;
            nodes.sort_by(|a, b| b.resolved_time().cmp(&a.resolved_time()));
            Ok(nodes
                .into_iter()
                .skip(request.offset)
                .take(limit)
                .collect())
        }
    }
}

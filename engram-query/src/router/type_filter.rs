//! Wildcard recall narrowed to a single node type.

use engram_core::models::{GraphNode, MemoryQuery, RecallQuery};
use engram_core::EngramResult;

use super::QueryDeps;
use crate::filters;

/// Fetch every node of the requested type at depth 1 without edges, then
/// post-process the same way text search does: time bounds client-side,
/// then limit truncation.
pub fn execute_type_filter(
    deps: &QueryDeps<'_>,
    request: &MemoryQuery,
) -> EngramResult<Vec<GraphNode>> {
    let recall = RecallQuery {
        node_id: "*".to_string(),
        scope: request.scope.unwrap_or_default(),
        node_type: request.node_type.clone(),
        include_edges: false,
        depth: 1,
    };

    let mut nodes = deps.source.recall(&recall)?;

    if request.since.is_some() || request.until.is_some() {
        nodes = filters::apply_time_window(nodes, request.since, request.until);
    }

    let limit = request.limit.unwrap_or(deps.config.default_search_limit);
    nodes.truncate(limit);
    Ok(nodes)
}

//! Direct lookup by node id.

use engram_core::models::{GraphNode, MemoryQuery, RecallQuery};
use engram_core::EngramResult;

use super::QueryDeps;

/// Recall one node by id, expanding neighbors when a depth above 1 is
/// requested. A missing node yields an empty result, not an error.
pub fn execute_node_lookup(
    deps: &QueryDeps<'_>,
    request: &MemoryQuery,
) -> EngramResult<Vec<GraphNode>> {
    let Some(node_id) = request.node_id.clone() else {
        return Ok(Vec::new());
    };

    let recall = RecallQuery {
        node_id,
        scope: request.scope.unwrap_or_default(),
        node_type: None,
        include_edges: request.include_edges,
        depth: request.depth.unwrap_or(1),
    };

    deps.source.recall(&recall)
}

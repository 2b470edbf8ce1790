//! Neighborhood query around a pivot node.

use engram_core::models::{GraphNode, MemoryQuery, RecallQuery};
use engram_core::EngramResult;

use super::QueryDeps;

/// Recall the pivot's neighborhood with edges attached, then drop the
/// pivot itself. Depth defaults to 2 so the result covers direct
/// neighbors rather than collapsing to nothing.
pub fn execute_related(
    deps: &QueryDeps<'_>,
    request: &MemoryQuery,
) -> EngramResult<Vec<GraphNode>> {
    let Some(pivot) = request.related_to.clone() else {
        return Ok(Vec::new());
    };

    let recall = RecallQuery {
        node_id: pivot.clone(),
        scope: request.scope.unwrap_or_default(),
        node_type: None,
        include_edges: true,
        depth: request.depth.unwrap_or(2),
    };

    let mut nodes = deps.source.recall(&recall)?;
    nodes.retain(|node| node.id != pivot);

    if let Some(limit) = request.limit {
        nodes.truncate(limit);
    }
    Ok(nodes)
}

//! Scope-wide recall when no narrowing field is present.

use engram_core::models::{GraphNode, MemoryQuery, RecallQuery};
use engram_core::EngramResult;

use super::QueryDeps;

pub fn execute_wildcard(
    deps: &QueryDeps<'_>,
    request: &MemoryQuery,
) -> EngramResult<Vec<GraphNode>> {
    let recall = RecallQuery {
        node_id: "*".to_string(),
        scope: request.scope.unwrap_or_default(),
        node_type: request.node_type.clone(),
        include_edges: request.include_edges,
        depth: request.depth.unwrap_or(1),
    };

    let mut nodes = deps.source.recall(&recall)?;
    if let Some(limit) = request.limit {
        nodes.truncate(limit);
    }
    Ok(nodes)
}

//! Bulk edge hydration for result sets.

use engram_core::models::{GraphEdge, GraphNode, Scope};
use engram_core::EngramResult;
use engram_storage::pool::ReadPool;
use engram_storage::queries::edge_ops;

/// Fetch every edge touching any of the given nodes in one query.
pub fn hydrate_edges(
    readers: &ReadPool,
    nodes: &[GraphNode],
    scope: Option<Scope>,
) -> EngramResult<Vec<GraphEdge>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
    readers.with_conn(|conn| edge_ops::get_edges_for_nodes(conn, &ids, scope))
}

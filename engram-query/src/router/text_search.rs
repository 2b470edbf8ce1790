//! Token-based text search through the memory source.

use engram_core::models::{GraphNode, MemoryQuery, SearchFilter};
use engram_core::EngramResult;

use super::QueryDeps;
use crate::filters;

/// Run the search collaborator, then apply any time bounds client-side
/// since the collaborator does not understand them.
pub fn execute_text_search(
    deps: &QueryDeps<'_>,
    request: &MemoryQuery,
) -> EngramResult<Vec<GraphNode>> {
    let Some(text) = request.query.as_deref() else {
        return Ok(Vec::new());
    };

    let limit = request.limit.unwrap_or(deps.config.default_search_limit);
    let filter = SearchFilter {
        scope: request.scope,
        node_type: request.node_type.clone(),
        tags: request.tags.clone(),
        limit,
    };

    let mut nodes = deps.source.search(text, &filter)?;

    if request.since.is_some() || request.until.is_some() {
        nodes = filters::apply_time_window(nodes, request.since, request.until);
    }

    nodes.truncate(limit);
    Ok(nodes)
}

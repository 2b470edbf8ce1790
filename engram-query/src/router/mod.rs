//! Query router: classifies a memory query into a strategy and
//! dispatches it to the matching handler.

pub mod node_lookup;
pub mod related;
pub mod text_search;
pub mod time_range;
pub mod type_filter;
pub mod wildcard;

pub use node_lookup::execute_node_lookup;
pub use related::execute_related;
pub use text_search::execute_text_search;
pub use time_range::execute_time_range;
pub use type_filter::execute_type_filter;
pub use wildcard::execute_wildcard;

use tracing::debug;

use engram_core::config::QueryConfig;
use engram_core::models::{is_wildcard, GraphNode, MemoryQuery};
use engram_core::traits::IMemorySource;
use engram_core::EngramResult;
use engram_storage::pool::ReadPool;

/// Strategy a memory query resolves to. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStrategy {
    /// Direct lookup by node id, with optional traversal.
    NodeId,
    /// Token-based text search through the collaborator.
    TextSearch,
    /// Neighborhood of a pivot node, pivot excluded.
    Related,
    /// SQL window scan over `updated_at`.
    TimeRange,
    /// Wildcard recall narrowed to one node type.
    TypeFilter,
    /// Scope-wide recall with no narrowing field.
    Wildcard,
}

impl QueryStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStrategy::NodeId => "node_id",
            QueryStrategy::TextSearch => "text_search",
            QueryStrategy::Related => "related",
            QueryStrategy::TimeRange => "time_range",
            QueryStrategy::TypeFilter => "type_filter",
            QueryStrategy::Wildcard => "wildcard",
        }
    }
}

/// Pick the strategy for a request. First match wins:
/// node id, then query text, then pivot, then time bounds, then type.
/// A wildcard node id ("*", "%", "all") does not count as a node id.
pub fn classify(request: &MemoryQuery) -> QueryStrategy {
    if request
        .node_id
        .as_deref()
        .is_some_and(|id| !is_wildcard(id))
    {
        return QueryStrategy::NodeId;
    }
    if request.query.is_some() {
        return QueryStrategy::TextSearch;
    }
    if request.related_to.is_some() {
        return QueryStrategy::Related;
    }
    if request.since.is_some() || request.until.is_some() {
        return QueryStrategy::TimeRange;
    }
    if request.node_type.is_some() {
        return QueryStrategy::TypeFilter;
    }
    QueryStrategy::Wildcard
}

/// Shared handler context: read pool for direct scans, the memory
/// source collaborator, and limits.
pub struct QueryDeps<'a> {
    pub readers: &'a ReadPool,
    pub source: &'a dyn IMemorySource,
    pub config: &'a QueryConfig,
}

/// Classify and run a memory query.
pub fn dispatch(deps: &QueryDeps<'_>, request: &MemoryQuery) -> EngramResult<Vec<GraphNode>> {
    let strategy = classify(request);
    debug!(strategy = strategy.as_str(), "dispatching memory query");

    match strategy {
        QueryStrategy::NodeId => node_lookup::execute_node_lookup(deps, request),
        QueryStrategy::TextSearch => text_search::execute_text_search(deps, request),
        QueryStrategy::Related => related::execute_related(deps, request),
        QueryStrategy::TimeRange => time_range::execute_time_range(deps, request),
        QueryStrategy::TypeFilter => type_filter::execute_type_filter(deps, request),
        QueryStrategy::Wildcard => wildcard::execute_wildcard(deps, request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_precedence() {
        let mut request = MemoryQuery {
            node_id: Some("node-1".to_string()),
            query: Some("heron".to_string()),
            related_to: Some("node-2".to_string()),
            since: Some(chrono::Utc::now()),
            node_type: Some("observation".to_string()),
            ..MemoryQuery::default()
        };
        assert_eq!(classify(&request), QueryStrategy::NodeId);

        request.node_id = None;
        assert_eq!(classify(&request), QueryStrategy::TextSearch);

        request.query = None;
        assert_eq!(classify(&request), QueryStrategy::Related);

        request.related_to = None;
        assert_eq!(classify(&request), QueryStrategy::TimeRange);

        request.since = None;
        assert_eq!(classify(&request), QueryStrategy::TypeFilter);

        request.node_type = None;
        assert_eq!(classify(&request), QueryStrategy::Wildcard);
    }

    #[test]
    fn wildcard_node_id_does_not_classify_as_lookup() {
        for token in ["*", "%", "all"] {
            let request = MemoryQuery {
                node_id: Some(token.to_string()),
                ..MemoryQuery::default()
            };
            assert_eq!(classify(&request), QueryStrategy::Wildcard);
        }
    }

    #[test]
    fn until_alone_selects_time_range() {
        let request = MemoryQuery {
            until: Some(chrono::Utc::now()),
            ..MemoryQuery::default()
        };
        assert_eq!(classify(&request), QueryStrategy::TimeRange);
    }
}

//! IMemorySource, the recall/search collaborator consumed by the
//! query engine.

use crate::errors::EngramResult;
use crate::models::{GraphNode, RecallQuery, SearchFilter};

/// Generic node fetch and text search over the memory graph.
///
/// Both operations are blocking storage reads; async callers offload
/// accordingly. Implementations recover row-level mapping failures
/// internally (skip and log) and only error on storage-level failure.
pub trait IMemorySource: Send + Sync {
    /// Fetch by id (wildcard-aware) with optional relation traversal.
    /// Hydrated edges ride under the reserved `_edges` attribute key.
    fn recall(&self, query: &RecallQuery) -> EngramResult<Vec<GraphNode>>;

    /// Free-text search. `type:` and `scope:` prefixes embedded in the
    /// query string override the corresponding filter fields; remaining
    /// lowercased terms are matched against node ids and serialized
    /// attributes. An empty term set matches every node.
    fn search(&self, text: &str, filter: &SearchFilter) -> EngramResult<Vec<GraphNode>>;
}

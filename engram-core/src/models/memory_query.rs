//! Flexible query request plus the collaborator query types it lowers to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Scope;

/// A composite memory query. Every field is optional; the router
/// classifies the populated fields into exactly one strategy, with
/// "most specific identifier wins" precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryQuery {
    /// Exact node id, or a wildcard token ("*", "%", "all").
    pub node_id: Option<String>,
    /// Free-text search string. May embed `type:` / `scope:` prefixes.
    pub query: Option<String>,
    /// Pivot node id for "what relates to this" traversal.
    pub related_to: Option<String>,
    /// Inclusive lower time bound.
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper time bound.
    pub until: Option<DateTime<Utc>>,
    /// Scope filter.
    pub scope: Option<Scope>,
    /// Node type filter.
    pub node_type: Option<String>,
    /// Tag filter, any-match against `attributes.tags`.
    pub tags: Vec<String>,
    /// Attach touching edges to returned nodes.
    pub include_edges: bool,
    /// Relation traversal depth in node layers (1 = the node itself).
    pub depth: Option<u32>,
    /// Result cap.
    pub limit: Option<usize>,
    /// Result offset (time-range strategy only).
    pub offset: usize,
}

/// Node fetch-by-id request for the recall collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallQuery {
    /// Node id or wildcard token.
    pub node_id: String,
    /// Scope to fetch from.
    #[serde(default)]
    pub scope: Scope,
    /// Optional type filter (wildcard recall only).
    #[serde(default)]
    pub node_type: Option<String>,
    /// Attach touching edges to each returned node.
    #[serde(default)]
    pub include_edges: bool,
    /// Traversal depth in node layers.
    #[serde(default = "default_depth")]
    pub depth: u32,
}

fn default_depth() -> u32 {
    1
}

/// Filters for the generic search collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilter {
    pub scope: Option<Scope>,
    pub node_type: Option<String>,
    /// Any-match tag filter.
    pub tags: Vec<String>,
    pub limit: usize,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            scope: None,
            node_type: None,
            tags: Vec::new(),
            limit: 100,
        }
    }
}

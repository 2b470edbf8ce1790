//! SQLite-backed memory source: recall by id (with breadth-first
//! traversal) and token-based text search.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::warn;

use engram_core::config::QueryConfig;
use engram_core::models::{is_wildcard, GraphEdge, GraphNode, RecallQuery, Scope, SearchFilter};
use engram_core::traits::IMemorySource;
use engram_core::EngramResult;
use engram_storage::pool::ReadPool;
use engram_storage::queries::{edge_ops, node_crud};

/// Default `IMemorySource` reading straight from the graph tables.
pub struct SqliteMemorySource {
    readers: Arc<ReadPool>,
    config: QueryConfig,
}

impl SqliteMemorySource {
    pub fn new(readers: Arc<ReadPool>, config: QueryConfig) -> Self {
        Self { readers, config }
    }

    /// Breadth-first expansion from a root node.
    ///
    /// `depth` counts node layers: 1 keeps just the root, 2 adds direct
    /// neighbors, and so on. Each node appears once even when multiple
    /// edges reach it.
    fn traverse(
        &self,
        root: GraphNode,
        scope: Scope,
        depth: u32,
    ) -> EngramResult<Vec<GraphNode>> {
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(root.id.clone());

        let mut queue: VecDeque<(String, u32)> = VecDeque::new();
        queue.push_back((root.id.clone(), 0));

        let mut results = vec![root];

        while let Some((id, layer)) = queue.pop_front() {
            if layer + 1 >= depth {
                continue;
            }

            let edges = self
                .readers
                .with_conn(|conn| edge_ops::get_edges_for_node(conn, &id, scope))?;

            for edge in edges {
                let far = if edge.source == id {
                    edge.target
                } else {
                    edge.source
                };
                if !visited.insert(far.clone()) {
                    continue;
                }
                let found = self
                    .readers
                    .with_conn(|conn| node_crud::get_node(conn, &far, scope))?;
                if let Some(node) = found {
                    queue.push_back((node.id.clone(), layer + 1));
                    results.push(node);
                }
            }
        }

        Ok(results)
    }

    /// Attach each node's touching edges under its `_edges` attribute.
    fn attach_scoped_edges(&self, nodes: &mut [GraphNode], scope: Scope) -> EngramResult<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let edges = self
            .readers
            .with_conn(|conn| edge_ops::get_edges_for_nodes(conn, &ids, Some(scope)))?;

        for node in nodes.iter_mut() {
            let touching: Vec<GraphEdge> = edges
                .iter()
                .filter(|e| e.source == node.id || e.target == node.id)
                .cloned()
                .collect();
            node.attach_edges(&touching);
        }
        Ok(())
    }
}

impl IMemorySource for SqliteMemorySource {
    fn recall(&self, query: &RecallQuery) -> EngramResult<Vec<GraphNode>> {
        let scope = query.scope;

        let mut nodes = if is_wildcard(&query.node_id) {
            self.readers.with_conn(|conn| {
                node_crud::get_nodes_by_scope(
                    conn,
                    scope,
                    query.node_type.as_deref(),
                    self.config.wildcard_recall_limit,
                )
            })?
        } else {
            let root = self
                .readers
                .with_conn(|conn| node_crud::get_node(conn, &query.node_id, scope))?;
            match root {
                Some(root) if query.depth > 1 => self.traverse(root, scope, query.depth)?,
                Some(root) => vec![root],
                None => Vec::new(),
            }
        };

        if query.include_edges {
            self.attach_scoped_edges(&mut nodes, scope)?;
        }
        Ok(nodes)
    }

    fn search(&self, text: &str, filter: &SearchFilter) -> EngramResult<Vec<GraphNode>> {
        let mut scope = filter.scope.unwrap_or_default();
        let mut node_type = filter.node_type.clone();
        let mut terms: Vec<String> = Vec::new();

        for token in text.split_whitespace() {
            if let Some(raw) = token.strip_prefix("scope:") {
                match Scope::parse(raw) {
                    Some(parsed) => scope = parsed,
                    None => {
                        warn!(scope = raw, "search names an unknown scope, returning nothing");
                        return Ok(Vec::new());
                    }
                }
            } else if let Some(raw) = token.strip_prefix("type:") {
                node_type = Some(raw.to_string());
            } else {
                terms.push(token.to_lowercase());
            }
        }

        // Candidate scan is capped; matching happens client-side.
        let candidates = self.readers.with_conn(|conn| {
            node_crud::get_nodes_by_scope(
                conn,
                scope,
                node_type.as_deref(),
                self.config.fallback_fetch_limit,
            )
        })?;

        let mut matches: Vec<GraphNode> = candidates
            .into_iter()
            .filter(|node| node_matches_terms(node, &terms))
            .collect();

        if !filter.tags.is_empty() {
            matches.retain(|node| node.has_any_tag(&filter.tags));
        }

        matches.truncate(filter.limit);
        Ok(matches)
    }
}

/// A node matches when any term appears in its lowercased id or
/// serialized attributes. No terms matches everything.
fn node_matches_terms(node: &GraphNode, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let id = node.id.to_lowercase();
    let attributes = serde_json::to_string(&node.attributes)
        .unwrap_or_default()
        .to_lowercase();
    terms
        .iter()
        .any(|term| id.contains(term.as_str()) || attributes.contains(term.as_str()))
}

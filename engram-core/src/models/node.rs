//! Graph node model, scope taxonomy, and time resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::GraphEdge;

/// Reserved attribute key under which hydrated edges are attached.
pub const EDGES_ATTRIBUTE_KEY: &str = "_edges";

/// Node type of internal metric time-series rows. These are operational
/// telemetry and must never surface in generic memory browsing.
pub const METRIC_SERIES_TYPE: &str = "tsdb_data";

/// True when `token` is one of the recall wildcards selecting every node
/// in a scope.
pub fn is_wildcard(token: &str) -> bool {
    matches!(token, "*" | "%" | "all")
}

/// Visibility scope of a node or edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Local,
    Identity,
    Environment,
    Community,
}

impl Scope {
    /// Canonical lowercase name, matching the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Identity => "identity",
            Scope::Environment => "environment",
            Scope::Community => "community",
        }
    }

    /// Parse a scope name, case-insensitive. `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "local" => Some(Scope::Local),
            "identity" => Some(Scope::Identity),
            "environment" => Some(Scope::Environment),
            "community" => Some(Scope::Community),
            _ => None,
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Local
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single node in the memory graph.
///
/// Attributes are an open string-keyed map; the write path may stash a
/// `created_at` or `timestamp` there, which takes precedence over the
/// top-level `updated_at` when ordering nodes in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Stable identifier, unique within a scope.
    pub id: String,
    /// Open-ended type tag (e.g. "observation", "task", "concept").
    #[serde(rename = "type")]
    pub node_type: String,
    /// Visibility scope.
    pub scope: Scope,
    /// Semi-structured attribute payload.
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Monotonically increasing version, last-writer-wins.
    #[serde(default)]
    pub version: i64,
    /// Actor that last wrote the node.
    #[serde(default)]
    pub updated_by: Option<String>,
    /// Last write time. May be absent on legacy rows.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GraphNode {
    /// Resolve the node's event time with strict precedence:
    /// `attributes.created_at`, then `attributes.timestamp`, then the
    /// top-level `updated_at`. An unparseable attribute value falls
    /// through to the next candidate. `None` when no time is resolvable;
    /// such nodes are excluded from time-ordered operations, never an
    /// error.
    pub fn resolved_time(&self) -> Option<DateTime<Utc>> {
        for key in ["created_at", "timestamp"] {
            if let Some(Value::String(raw)) = self.attributes.get(key) {
                if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                    return Some(dt.with_timezone(&Utc));
                }
            }
        }
        self.updated_at
    }

    /// True when any entry of `attributes.tags` matches one of `wanted`.
    pub fn has_any_tag(&self, wanted: &[String]) -> bool {
        let Some(Value::Array(tags)) = self.attributes.get("tags") else {
            return false;
        };
        tags.iter()
            .filter_map(|t| t.as_str())
            .any(|t| wanted.iter().any(|w| w == t))
    }

    /// Attach hydrated edges under the reserved `_edges` attribute key,
    /// replacing any previous value.
    pub fn attach_edges(&mut self, edges: &[GraphEdge]) {
        let rendered: Vec<Value> = edges
            .iter()
            .filter_map(|e| serde_json::to_value(e).ok())
            .collect();
        self.attributes
            .insert(EDGES_ATTRIBUTE_KEY.to_string(), Value::Array(rendered));
    }
}

//! Graph edge model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Scope;

/// Structured payload carried by an edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeAttributes {
    /// When the relationship was recorded.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Optional free-form context for the relationship.
    #[serde(default)]
    pub context: Option<String>,
}

/// A directed, weighted relationship between two nodes in one scope.
///
/// The query engine never validates that the referenced nodes still
/// exist; an edge may reference a node not present in a returned set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Relationship tag (e.g. "created", "observed", "depends_on").
    pub relationship: String,
    /// Scope shared by both endpoints.
    pub scope: Scope,
    /// Relationship strength.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Edge payload.
    #[serde(default)]
    pub attributes: EdgeAttributes,
}

fn default_weight() -> f64 {
    1.0
}

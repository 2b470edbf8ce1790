//! Edge reads for traversal and bulk hydration, plus the seeding insert.

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection};
use tracing::warn;
use uuid::Uuid;

use engram_core::errors::EngramResult;
use engram_core::models::{EdgeAttributes, GraphEdge, Scope};

use crate::to_storage_err;

const EDGES_FOR_NODE: &str = "SELECT source_node_id, target_node_id, scope, relationship, \
     weight, attributes_json, created_at \
     FROM graph_edges \
     WHERE scope = ?2 AND (source_node_id = ?1 OR target_node_id = ?1)";

/// Base SELECT for bulk hydration; the IN lists are expanded per query.
const EDGES_FOR_NODES: &str = "SELECT source_node_id, target_node_id, scope, relationship, \
     weight, attributes_json, created_at \
     FROM graph_edges";

/// Insert an edge between two existing nodes. Returns the generated
/// edge id. Fails when either endpoint is missing (foreign keys on).
pub fn insert_edge(conn: &Connection, edge: &GraphEdge) -> EngramResult<String> {
    let edge_id = Uuid::new_v4().to_string();
    let attributes_json =
        serde_json::to_string(&edge.attributes).map_err(|e| to_storage_err(e.to_string()))?;
    let created_at = edge
        .attributes
        .created_at
        .unwrap_or_else(Utc::now)
        .to_rfc3339();

    conn.execute(
        "INSERT INTO graph_edges (
            edge_id, source_node_id, target_node_id, scope,
            relationship, weight, attributes_json, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            edge_id,
            edge.source,
            edge.target,
            edge.scope.as_str(),
            edge.relationship,
            edge.weight,
            attributes_json,
            created_at,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(edge_id)
}

/// All edges touching one node in a scope.
pub fn get_edges_for_node(
    conn: &Connection,
    node_id: &str,
    scope: Scope,
) -> EngramResult<Vec<GraphEdge>> {
    let mut stmt = conn
        .prepare(EDGES_FOR_NODE)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![node_id, scope.as_str()], read_edge_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_edges(rows)
}

/// One query selecting every edge touching any id in `node_ids`,
/// optionally restricted to a scope.
pub fn get_edges_for_nodes(
    conn: &Connection,
    node_ids: &[String],
    scope: Option<Scope>,
) -> EngramResult<Vec<GraphEdge>> {
    if node_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; node_ids.len()].join(", ");
    let mut sql = format!(
        "{EDGES_FOR_NODES} \
         WHERE (source_node_id IN ({placeholders}) OR target_node_id IN ({placeholders}))"
    );
    let mut binds: Vec<&str> = node_ids
        .iter()
        .chain(node_ids.iter())
        .map(String::as_str)
        .collect();
    if let Some(scope) = scope {
        sql.push_str(" AND scope = ?");
        binds.push(scope.as_str());
    }

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(binds), read_edge_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_edges(rows)
}

/// Raw edge row as stored, before value mapping.
pub struct RawEdge {
    pub source_node_id: String,
    pub target_node_id: String,
    pub scope: String,
    pub relationship: String,
    pub weight: f64,
    pub attributes_json: Option<String>,
    pub created_at: Option<String>,
}

fn read_edge_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEdge> {
    Ok(RawEdge {
        source_node_id: row.get(0)?,
        target_node_id: row.get(1)?,
        scope: row.get(2)?,
        relationship: row.get(3)?,
        weight: row.get(4)?,
        attributes_json: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Convert a raw edge row. The `created_at` column backfills the
/// attribute when the JSON payload carries none.
pub fn raw_to_edge(raw: RawEdge) -> EngramResult<GraphEdge> {
    let scope = Scope::parse(&raw.scope).ok_or_else(|| {
        to_storage_err(format!(
            "unknown scope '{}' on edge {} -> {}",
            raw.scope, raw.source_node_id, raw.target_node_id
        ))
    })?;

    let mut attributes: EdgeAttributes = match raw.attributes_json.as_deref() {
        None | Some("") => EdgeAttributes::default(),
        Some(json) => serde_json::from_str(json).map_err(|e| {
            to_storage_err(format!(
                "parse attributes on edge {} -> {}: {e}",
                raw.source_node_id, raw.target_node_id
            ))
        })?,
    };
    if attributes.created_at.is_none() {
        attributes.created_at = raw
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));
    }

    Ok(GraphEdge {
        source: raw.source_node_id,
        target: raw.target_node_id,
        relationship: raw.relationship,
        scope,
        weight: raw.weight,
        attributes,
    })
}

/// Collect mapped rows, skipping (with a warning) any edge that fails
/// value mapping. A malformed edge never aborts the whole hydration.
fn collect_edges<I>(rows: I) -> EngramResult<Vec<GraphEdge>>
where
    I: IntoIterator<Item = rusqlite::Result<RawEdge>>,
{
    let mut edges = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        match raw_to_edge(raw) {
            Ok(edge) => edges.push(edge),
            Err(e) => warn!(error = %e, "skipping malformed edge row"),
        }
    }
    Ok(edges)
}

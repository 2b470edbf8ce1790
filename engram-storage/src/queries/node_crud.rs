//! Insert, get, list, delete for graph nodes.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use tracing::warn;

use engram_core::errors::EngramResult;
use engram_core::models::{GraphNode, Scope};

use crate::to_storage_err;

const NODE_BY_ID: &str = "SELECT node_id, scope, node_type, attributes_json, version, \
     updated_by, updated_at \
     FROM graph_nodes WHERE node_id = ?1 AND scope = ?2";

const NODES_BY_SCOPE: &str = "SELECT node_id, scope, node_type, attributes_json, version, \
     updated_by, updated_at \
     FROM graph_nodes WHERE scope = ?1 \
     ORDER BY updated_at DESC LIMIT ?2";

const NODES_BY_SCOPE_AND_TYPE: &str = "SELECT node_id, scope, node_type, attributes_json, \
     version, updated_by, updated_at \
     FROM graph_nodes WHERE scope = ?1 AND node_type = ?2 \
     ORDER BY updated_at DESC LIMIT ?3";

/// Upsert a node. `created_at` is preserved across updates;
/// `updated_at` falls back to now when the model carries none.
pub fn upsert_node(conn: &Connection, node: &GraphNode) -> EngramResult<()> {
    let attributes_json =
        serde_json::to_string(&node.attributes).map_err(|e| to_storage_err(e.to_string()))?;
    let updated_at = node.updated_at.unwrap_or_else(Utc::now).to_rfc3339();

    conn.execute(
        "INSERT INTO graph_nodes (
            node_id, scope, node_type, attributes_json, version,
            updated_by, updated_at, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
        ON CONFLICT (node_id, scope) DO UPDATE SET
            node_type = excluded.node_type,
            attributes_json = excluded.attributes_json,
            version = excluded.version,
            updated_by = excluded.updated_by,
            updated_at = excluded.updated_at",
        params![
            node.id,
            node.scope.as_str(),
            node.node_type,
            attributes_json,
            node.version,
            node.updated_by,
            updated_at,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get a single node by id and scope. A row that fails value mapping
/// is logged and reported as absent.
pub fn get_node(conn: &Connection, node_id: &str, scope: Scope) -> EngramResult<Option<GraphNode>> {
    let mut stmt = conn
        .prepare(NODE_BY_ID)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = stmt
        .query_row(params![node_id, scope.as_str()], read_node_row)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    match result {
        Some(raw) => match raw_to_node(raw) {
            Ok(node) => Ok(Some(node)),
            Err(e) => {
                warn!(node_id, error = %e, "skipping malformed node row");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

/// List nodes in a scope, optionally restricted to one type, newest
/// first. Serves wildcard recall and type browsing.
pub fn get_nodes_by_scope(
    conn: &Connection,
    scope: Scope,
    node_type: Option<&str>,
    limit: usize,
) -> EngramResult<Vec<GraphNode>> {
    let limit = limit as i64;
    match node_type {
        Some(node_type) => {
            let mut stmt = conn
                .prepare(NODES_BY_SCOPE_AND_TYPE)
                .map_err(|e| to_storage_err(e.to_string()))?;
            let rows = stmt
                .query_map(params![scope.as_str(), node_type, limit], read_node_row)
                .map_err(|e| to_storage_err(e.to_string()))?;
            collect_nodes(rows)
        }
        None => {
            let mut stmt = conn
                .prepare(NODES_BY_SCOPE)
                .map_err(|e| to_storage_err(e.to_string()))?;
            let rows = stmt
                .query_map(params![scope.as_str(), limit], read_node_row)
                .map_err(|e| to_storage_err(e.to_string()))?;
            collect_nodes(rows)
        }
    }
}

/// Delete a node and every edge touching it in the same scope.
/// Returns the number of nodes removed (0 or 1).
pub fn remove_node(conn: &Connection, node_id: &str, scope: Scope) -> EngramResult<usize> {
    conn.execute(
        "DELETE FROM graph_edges
         WHERE scope = ?2 AND (source_node_id = ?1 OR target_node_id = ?1)",
        params![node_id, scope.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = conn
        .execute(
            "DELETE FROM graph_nodes WHERE node_id = ?1 AND scope = ?2",
            params![node_id, scope.as_str()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows)
}

/// Raw node row as stored, before value mapping.
pub struct RawNode {
    pub node_id: String,
    pub scope: String,
    pub node_type: String,
    pub attributes_json: Option<String>,
    pub version: i64,
    pub updated_by: Option<String>,
    pub updated_at: Option<String>,
}

/// Read the shared node column set from a row. Callers select columns
/// in this exact order; extra trailing columns are ignored.
pub(crate) fn read_node_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawNode> {
    Ok(RawNode {
        node_id: row.get(0)?,
        scope: row.get(1)?,
        node_type: row.get(2)?,
        attributes_json: row.get(3)?,
        version: row.get(4)?,
        updated_by: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Convert a raw row into a GraphNode. Fails on an unknown scope or
/// malformed attributes; an unparseable `updated_at` is treated as
/// absent (legacy rows).
pub fn raw_to_node(raw: RawNode) -> EngramResult<GraphNode> {
    let scope = Scope::parse(&raw.scope).ok_or_else(|| {
        to_storage_err(format!(
            "unknown scope '{}' on node {}",
            raw.scope, raw.node_id
        ))
    })?;

    let attributes: Map<String, Value> = match raw.attributes_json.as_deref() {
        None | Some("") => Map::new(),
        Some(json) => serde_json::from_str(json)
            .map_err(|e| to_storage_err(format!("parse attributes for {}: {e}", raw.node_id)))?,
    };

    let updated_at = raw
        .updated_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(GraphNode {
        id: raw.node_id,
        node_type: raw.node_type,
        scope,
        attributes,
        version: raw.version,
        updated_by: raw.updated_by,
        updated_at,
    })
}

/// Collect mapped rows, skipping (with a warning) any row that fails
/// value mapping. Row iteration errors still propagate.
pub(crate) fn collect_nodes<I>(rows: I) -> EngramResult<Vec<GraphNode>>
where
    I: IntoIterator<Item = rusqlite::Result<RawNode>>,
{
    let mut nodes = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        match raw_to_node(raw) {
            Ok(node) => nodes.push(node),
            Err(e) => warn!(error = %e, "skipping malformed node row"),
        }
    }
    Ok(nodes)
}

/// Helper trait to make `query_row` return `Option` on not-found.
trait OptionalRow<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

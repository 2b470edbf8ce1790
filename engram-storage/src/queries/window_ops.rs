//! Time-window queries over the node table: the direct path for
//! time-range browsing and timeline day sampling.

use rusqlite::{params_from_iter, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::{GraphNode, WindowQuery, METRIC_SERIES_TYPE};

use crate::queries::node_crud::{collect_nodes, read_node_row};
use crate::to_storage_err;

/// Base SELECT: half-open window on `updated_at`, metric time-series
/// rows always excluded. Filter predicates and ordering are appended
/// per query.
const NODES_IN_WINDOW: &str = "SELECT node_id, scope, node_type, attributes_json, version, \
     updated_by, updated_at, created_at \
     FROM graph_nodes \
     WHERE updated_at >= ? AND updated_at < ? AND node_type != ?";

const COUNT_IN_WINDOW: &str = "SELECT COUNT(*) FROM graph_nodes \
     WHERE updated_at >= ? AND updated_at < ? AND node_type != ?";

const SCOPE_PREDICATE: &str = " AND scope = ?";
const TYPE_PREDICATE: &str = " AND node_type = ?";

/// Execute a window query with the requested ordering and paging.
pub fn get_nodes_in_window(
    conn: &Connection,
    query: &WindowQuery,
) -> EngramResult<Vec<GraphNode>> {
    let start = query.start.to_rfc3339();
    let end = query.end.to_rfc3339();

    let mut sql = String::from(NODES_IN_WINDOW);
    let mut binds: Vec<&str> = vec![&start, &end, METRIC_SERIES_TYPE];
    if let Some(scope) = query.scope {
        sql.push_str(SCOPE_PREDICATE);
        binds.push(scope.as_str());
    }
    if let Some(ref node_type) = query.node_type {
        sql.push_str(TYPE_PREDICATE);
        binds.push(node_type);
    }
    sql.push_str(&format!(
        " ORDER BY {} LIMIT {} OFFSET {}",
        query.order.sql_clause(),
        query.limit,
        query.offset
    ));

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(binds), read_node_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_nodes(rows)
}

/// Exact node count for a window, with the same filter semantics as
/// the select.
pub fn count_nodes_in_window(conn: &Connection, query: &WindowQuery) -> EngramResult<u64> {
    let start = query.start.to_rfc3339();
    let end = query.end.to_rfc3339();

    let mut sql = String::from(COUNT_IN_WINDOW);
    let mut binds: Vec<&str> = vec![&start, &end, METRIC_SERIES_TYPE];
    if let Some(scope) = query.scope {
        sql.push_str(SCOPE_PREDICATE);
        binds.push(scope.as_str());
    }
    if let Some(ref node_type) = query.node_type {
        sql.push_str(TYPE_PREDICATE);
        binds.push(node_type);
    }

    let count: i64 = conn
        .query_row(&sql, params_from_iter(binds), |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u64)
}

//! Aggregate statistics over the node table.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};

use engram_core::errors::EngramResult;
use engram_core::models::GraphStats;

use crate::to_storage_err;

/// Population and freshness statistics. Counts cover every node,
/// metric rows included; this is operational reporting, not browsing.
pub fn get_graph_stats(conn: &Connection) -> EngramResult<GraphStats> {
    let total_nodes: i64 = conn
        .query_row("SELECT COUNT(*) FROM graph_nodes", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let nodes_by_type = count_grouped(
        conn,
        "SELECT node_type, COUNT(*) FROM graph_nodes GROUP BY node_type",
    )?;
    let nodes_by_scope = count_grouped(
        conn,
        "SELECT scope, COUNT(*) FROM graph_nodes GROUP BY scope",
    )?;

    let cutoff = (Utc::now() - Duration::hours(24)).to_rfc3339();
    let recent_nodes_24h: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM graph_nodes WHERE updated_at >= ?1",
            params![cutoff],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let (oldest, newest): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT MIN(updated_at), MAX(updated_at) FROM graph_nodes",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(GraphStats {
        total_nodes: total_nodes as u64,
        nodes_by_type,
        nodes_by_scope,
        recent_nodes_24h: recent_nodes_24h as u64,
        oldest_node_date: parse_dt(oldest),
        newest_node_date: parse_dt(newest),
    })
}

fn count_grouped(conn: &Connection, sql: &str) -> EngramResult<BTreeMap<String, u64>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (key, count) = row.map_err(|e| to_storage_err(e.to_string()))?;
        counts.insert(key, count as u64);
    }
    Ok(counts)
}

fn parse_dt(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

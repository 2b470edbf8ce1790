//! v001: schema version tracking, graph node/edge tables, indexes.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS graph_nodes (
            node_id         TEXT NOT NULL,
            scope           TEXT NOT NULL,
            node_type       TEXT NOT NULL,
            attributes_json TEXT,
            version         INTEGER NOT NULL DEFAULT 1,
            updated_by      TEXT,
            updated_at      TEXT,
            created_at      TEXT,
            PRIMARY KEY (node_id, scope)
        );

        CREATE TABLE IF NOT EXISTS graph_edges (
            edge_id         TEXT NOT NULL,
            source_node_id  TEXT NOT NULL,
            target_node_id  TEXT NOT NULL,
            scope           TEXT NOT NULL,
            relationship    TEXT NOT NULL,
            weight          REAL NOT NULL DEFAULT 1.0,
            attributes_json TEXT,
            created_at      TEXT,
            PRIMARY KEY (edge_id, scope),
            FOREIGN KEY (source_node_id, scope)
                REFERENCES graph_nodes(node_id, scope),
            FOREIGN KEY (target_node_id, scope)
                REFERENCES graph_nodes(node_id, scope)
        );

        CREATE INDEX IF NOT EXISTS idx_graph_nodes_updated
            ON graph_nodes(updated_at);
        CREATE INDEX IF NOT EXISTS idx_graph_nodes_type
            ON graph_nodes(node_type);
        CREATE INDEX IF NOT EXISTS idx_graph_edges_source
            ON graph_edges(source_node_id, scope);
        CREATE INDEX IF NOT EXISTS idx_graph_edges_target
            ON graph_edges(target_node_id, scope);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

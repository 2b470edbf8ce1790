//! Connection management: single write connection + round-robin read pool.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::warn;

use engram_core::errors::{EngramResult, StorageError};

/// Largest allowed read pool size.
pub const MAX_READERS: usize = 8;

/// Read pool size used when the caller does not pick one.
pub const DEFAULT_READERS: usize = 4;

/// Apply the pragmas every engram connection runs with.
pub(crate) fn apply_pragmas(conn: &Connection) {
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "foreign_keys", "ON");
    let _ = conn.pragma_update(None, "busy_timeout", 5000);
}

fn open_connection(path: &Path) -> EngramResult<Connection> {
    let conn = Connection::open(path).map_err(|e| StorageError::ConnectionFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    apply_pragmas(&conn);
    Ok(conn)
}

/// The single writer. All mutations go through this connection.
pub struct WriteConnection {
    conn: tokio::sync::Mutex<Connection>,
}

impl WriteConnection {
    /// Open the write connection for a database path.
    pub fn open(path: &Path) -> EngramResult<Self> {
        let conn = open_connection(path)?;
        Ok(Self {
            conn: tokio::sync::Mutex::new(conn),
        })
    }

    /// Run a closure against the write connection.
    pub async fn with_conn<T, F>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&Connection) -> EngramResult<T>,
    {
        let conn = self.conn.lock().await;
        f(&conn)
    }

    /// Blocking variant for synchronous contexts (setup code, benches).
    /// Must not be called from within an async runtime.
    pub fn with_conn_sync<T, F>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&Connection) -> EngramResult<T>,
    {
        let conn = self.conn.blocking_lock();
        f(&conn)
    }
}

/// Round-robin pool of read connections.
///
/// Reads never write, so WAL lets all pool members run concurrently
/// with the single writer.
pub struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open `size` read connections. The size is clamped to
    /// `1..=MAX_READERS`.
    pub fn open(path: &Path, size: usize) -> EngramResult<Self> {
        let size = size.clamp(1, MAX_READERS);
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            connections.push(Mutex::new(open_connection(path)?));
        }
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Number of pooled connections.
    pub fn size(&self) -> usize {
        self.connections.len()
    }

    /// Run a closure against the next read connection. The connection
    /// is released when the closure returns, on every exit path.
    pub fn with_conn<T, F>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&Connection) -> EngramResult<T>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let conn = acquire_lock(&self.connections[idx]);
        f(&conn)
    }
}

/// Lock a pool slot, recovering from poisoning. A poisoned slot only
/// means a previous closure panicked; the connection itself is fine.
fn acquire_lock(slot: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    slot.lock().unwrap_or_else(|poisoned| {
        warn!("read pool mutex poisoned, recovering");
        poisoned.into_inner()
    })
}

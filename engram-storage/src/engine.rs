//! StorageEngine owns the write connection and read pool for one
//! database.

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use engram_core::errors::{EngramResult, StorageError};

use crate::migrations;
use crate::pool::{apply_pragmas, ReadPool, WriteConnection, DEFAULT_READERS};

/// Connection facade: migrations at open, then a single writer plus a
/// read pool over the same database.
pub struct StorageEngine {
    writer: Arc<WriteConnection>,
    readers: Arc<ReadPool>,
}

impl StorageEngine {
    /// Open (or create) a database file, run pending migrations, and
    /// build the pools.
    pub fn open(path: &Path) -> EngramResult<Self> {
        Self::open_at(path)
    }

    /// Open a private in-memory database, for tests and short-lived
    /// embedders.
    pub fn open_in_memory() -> EngramResult<Self> {
        // Shared-cache URI so the writer and all readers see the same
        // in-memory database.
        let uri = format!(
            "file:engram_{}?mode=memory&cache=shared",
            Uuid::new_v4().simple()
        );
        Self::open_at(Path::new(&uri))
    }

    fn open_at(path: &Path) -> EngramResult<Self> {
        let bootstrap = Connection::open(path).map_err(|e| StorageError::ConnectionFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        apply_pragmas(&bootstrap);
        migrations::run_migrations(&bootstrap)?;

        let writer = Arc::new(WriteConnection::open(path)?);
        let readers = Arc::new(ReadPool::open(path, DEFAULT_READERS)?);
        // Dropped only after the writer is open so an in-memory
        // database survives the handover.
        drop(bootstrap);

        debug!(path = %path.display(), readers = readers.size(), "storage engine ready");
        Ok(Self { writer, readers })
    }

    /// The single write connection.
    pub fn writer(&self) -> Arc<WriteConnection> {
        self.writer.clone()
    }

    /// The read pool.
    pub fn readers(&self) -> Arc<ReadPool> {
        self.readers.clone()
    }
}

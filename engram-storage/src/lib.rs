//! # engram-storage
//!
//! SQLite persistence layer for the Engram graph memory.
//! Single write connection + read pool (WAL mode), forward-only
//! migrations, and row-level query modules over the graph tables.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

/// Helper to convert a string message into an EngramError::Storage.
pub fn to_storage_err(msg: String) -> engram_core::EngramError {
    engram_core::EngramError::StorageError(engram_core::errors::StorageError::SqliteError {
        message: msg,
    })
}

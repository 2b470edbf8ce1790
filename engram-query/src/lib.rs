//! # engram-query
//!
//! Query engine for the Engram graph memory store.
//! Strategy-routed recall, text search, graph traversal, time-range
//! scans, timeline sampling with redistribution, and graph statistics.

pub mod engine;
pub mod fallback;
pub mod filters;
pub mod hydrate;
pub mod router;
pub mod source;
pub mod stats;
pub mod timeline;

pub use engine::QueryEngine;
pub use source::SqliteMemorySource;

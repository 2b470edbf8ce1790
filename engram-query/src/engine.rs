//! Query engine facade tying the router, timeline, and statistics
//! paths to a storage engine.

use std::sync::Arc;

use engram_core::config::QueryConfig;
use engram_core::models::{GraphNode, GraphStats, MemoryQuery, TimelineRequest, TimelineResponse};
use engram_core::traits::{IMemorySource, IQueryEngine};
use engram_core::EngramResult;
use engram_storage::pool::ReadPool;
use engram_storage::StorageEngine;

use crate::router::{self, QueryDeps};
use crate::source::SqliteMemorySource;
use crate::stats;
use crate::timeline;

/// Default query engine: routes queries through the strategy table and
/// reads via the storage engine's pool.
pub struct QueryEngine {
    readers: Arc<ReadPool>,
    source: Arc<dyn IMemorySource>,
    config: QueryConfig,
}

impl QueryEngine {
    /// Engine backed by the SQLite memory source over the same pool.
    pub fn new(storage: &StorageEngine, config: QueryConfig) -> Self {
        let source = Arc::new(SqliteMemorySource::new(storage.readers(), config.clone()));
        Self {
            readers: storage.readers(),
            source,
            config,
        }
    }

    /// Engine with a caller-supplied memory source.
    pub fn with_source(
        readers: Arc<ReadPool>,
        source: Arc<dyn IMemorySource>,
        config: QueryConfig,
    ) -> Self {
        Self {
            readers,
            source,
            config,
        }
    }

    fn deps(&self) -> QueryDeps<'_> {
        QueryDeps {
            readers: &self.readers,
            source: self.source.as_ref(),
            config: &self.config,
        }
    }
}

impl IQueryEngine for QueryEngine {
    async fn build_and_execute(&self, request: &MemoryQuery) -> EngramResult<Vec<GraphNode>> {
        router::dispatch(&self.deps(), request)
    }

    async fn get_timeline(&self, request: &TimelineRequest) -> EngramResult<TimelineResponse> {
        timeline::get_timeline(&self.deps(), request)
    }

    async fn get_stats(&self) -> EngramResult<GraphStats> {
        stats::get_stats(&self.readers)
    }
}

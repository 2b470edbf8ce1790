//! IQueryEngine, the public query surface of the engram system.

use crate::errors::EngramResult;
use crate::models::{GraphNode, GraphStats, MemoryQuery, TimelineRequest, TimelineResponse};

/// Query engine over the memory graph.
///
/// Implementations classify ad-hoc requests into a single strategy,
/// sample timelines day by day, and degrade to the search collaborator
/// when direct storage access fails.
#[allow(async_fn_in_trait)]
pub trait IQueryEngine: Send + Sync {
    /// Classify `request` into one strategy and execute it.
    async fn build_and_execute(&self, request: &MemoryQuery) -> EngramResult<Vec<GraphNode>>;

    /// Bounded, time-representative sample of recent nodes plus an
    /// activity histogram.
    async fn get_timeline(&self, request: &TimelineRequest) -> EngramResult<TimelineResponse>;

    /// Aggregate statistics over the node table.
    async fn get_stats(&self) -> EngramResult<GraphStats>;
}

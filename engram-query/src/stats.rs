//! Graph-wide statistics.

use engram_core::models::GraphStats;
use engram_core::EngramResult;
use engram_storage::pool::ReadPool;
use engram_storage::queries::stats_ops;

pub fn get_stats(readers: &ReadPool) -> EngramResult<GraphStats> {
    readers.with_conn(stats_ops::get_graph_stats)
}

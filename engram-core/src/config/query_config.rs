//! Query engine configuration.

use serde::{Deserialize, Serialize};

use crate::models::SampleOrder;

/// Configuration for the query and timeline engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Default cap for text search and time-range queries.
    pub default_search_limit: usize,
    /// Cap applied to wildcard recalls.
    pub wildcard_recall_limit: usize,
    /// Fixed fetch cap for the degraded search fallback path.
    pub fallback_fetch_limit: usize,
    /// Largest accepted timeline lookback.
    pub timeline_max_hours: u32,
    /// Lookback applied when a timeline request omits `hours`.
    pub timeline_default_hours: u32,
    /// Over-fetch multiplier for per-day sampling.
    pub day_overfetch_factor: usize,
    /// Row ordering used by the day sampler.
    pub sample_order: SampleOrder,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_search_limit: 100,
            wildcard_recall_limit: 100,
            fallback_fetch_limit: 1000,
            timeline_max_hours: 168, // one week
            timeline_default_hours: 24,
            day_overfetch_factor: 2,
            sample_order: SampleOrder::Random,
        }
    }
}

//! Timeline assembly: windowed sampling, hourly redistribution,
//! bucket counts, and optional edge hydration.

pub mod redistribute;
pub mod sampler;

pub use redistribute::redistribute as redistribute_candidates;

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use tracing::warn;

use engram_core::errors::QueryError;
use engram_core::models::{SampleOrder, TimelineRequest, TimelineResponse, WindowQuery};
use engram_core::EngramResult;
use engram_storage::queries::window_ops;

use crate::fallback;
use crate::hydrate;
use crate::router::QueryDeps;

/// Cap applied when a timeline request omits `limit`.
const DEFAULT_LIMIT: usize = 1_000;

/// Build a timeline over the trailing `hours` window.
///
/// The window is validated against the configured maximum, sampled day
/// by day, and redistributed across hours. Bucket counts and `total`
/// describe the sampled set before truncation to `limit`; `exact_total`
/// swaps in a full SQL count of the window instead.
pub fn get_timeline(
    deps: &QueryDeps<'_>,
    request: &TimelineRequest,
) -> EngramResult<TimelineResponse> {
    let hours = request.hours.unwrap_or(deps.config.timeline_default_hours);
    if hours == 0 || hours > deps.config.timeline_max_hours {
        return Err(QueryError::InvalidWindow(format!(
            "timeline window must cover 1..={} hours, got {hours}",
            deps.config.timeline_max_hours
        ))
        .into());
    }

    let bucket = request.resolved_bucket_size(hours);
    let now = Utc::now();
    let start = now - Duration::hours(i64::from(hours));
    let limit = request.limit.unwrap_or(DEFAULT_LIMIT);
    let node_type = request.node_type.as_deref();

    let sampled = sampler::sample_window(deps, start, now, limit, request.scope, node_type);
    let mut collected = match sampled {
        Ok(candidates) => redistribute::redistribute(candidates, limit),
        Err(e) => {
            warn!(error = %e, "timeline sampling failed, using search fallback");
            fallback::fetch_window_via_search(deps, start, now, request.scope, node_type)?
        }
    };

    // Nodes without a resolvable time cannot be sorted or bucketed.
    collected.retain(|node| node.resolved_time().is_some());
    collected.sort_by(|a, b| b.resolved_time().cmp(&a.resolved_time()));

    // Every bucket in the window appears, zero or not.
    let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
    let mut current = start;
    while current <= now {
        buckets.insert(bucket.label(current), 0);
        current += bucket.step();
    }
    for node in &collected {
        if let Some(t) = node.resolved_time() {
            if let Some(count) = buckets.get_mut(&bucket.label(t)) {
                *count += 1;
            }
        }
    }

    let mut total = collected.len();
    if request.exact_total {
        let full_window = WindowQuery {
            start,
            end: now,
            scope: request.scope,
            node_type: request.node_type.clone(),
            order: SampleOrder::Newest,
            limit,
            offset: 0,
        };
        total = deps
            .readers
            .with_conn(|conn| window_ops::count_nodes_in_window(conn, &full_window))?
            as usize;
    }

    let mut memories = collected;
    memories.truncate(limit);

    let edges = if request.include_edges {
        Some(hydrate::hydrate_edges(deps.readers, &memories, request.scope)?)
    } else {
        None
    };

    Ok(TimelineResponse {
        memories,
        edges,
        buckets,
        start_time: start,
        end_time: now,
        total,
    })
}

//! Per-day window sampling.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use engram_core::models::{GraphNode, Scope, WindowQuery};
use engram_core::EngramResult;
use engram_storage::queries::window_ops;

use crate::router::QueryDeps;

/// Sample the window one calendar day at a time, most recent day first.
///
/// Each day gets an equal share of the limit (at least one row) and is
/// over-fetched by `day_overfetch_factor` so redistribution has spares
/// to draw on when other days run empty. Day slices are clipped to the
/// requested window, so the first and last slice may be partial.
pub fn sample_window(
    deps: &QueryDeps<'_>,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    limit: usize,
    scope: Option<Scope>,
    node_type: Option<&str>,
) -> EngramResult<Vec<GraphNode>> {
    let window_secs = (now - start).num_seconds().max(0);
    let days_in_range = (window_secs / 86_400) as usize + 1;
    let nodes_per_day = (limit / days_in_range).max(1);
    let fetch_limit = nodes_per_day * deps.config.day_overfetch_factor;

    let mut sampled = Vec::new();

    for day_offset in 0..days_in_range {
        let day_start = (now - Duration::days(day_offset as i64))
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();
        let slice_start = day_start.max(start);
        let slice_end = (day_start + Duration::days(1)).min(now);
        if slice_end <= slice_start {
            continue;
        }

        let query = WindowQuery {
            start: slice_start,
            end: slice_end,
            scope,
            node_type: node_type.map(str::to_string),
            order: deps.config.sample_order,
            limit: fetch_limit,
            offset: 0,
        };

        let mut nodes = deps
            .readers
            .with_conn(|conn| window_ops::get_nodes_in_window(conn, &query))?;
        sampled.append(&mut nodes);
    }

    Ok(sampled)
}

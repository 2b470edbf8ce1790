//! Hourly redistribution of an over-sampled candidate set.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use engram_core::models::{BucketSize, GraphNode};

/// Trim candidates down to `limit` while spreading the kept rows
/// across hours instead of letting the busiest hour take every slot.
///
/// Under the limit the input passes through untouched. Over it, the
/// candidates are grouped by hour; every hour keeps an equal share
/// (most recent hours first), and any slots still free are filled
/// from the fullest hours. Never fabricates rows and never returns
/// more than `limit`.
pub fn redistribute(candidates: Vec<GraphNode>, limit: usize) -> Vec<GraphNode> {
    if candidates.len() <= limit {
        return candidates;
    }

    let mut by_hour: BTreeMap<String, Vec<GraphNode>> = BTreeMap::new();
    for node in candidates {
        if let Some(t) = node.resolved_time() {
            by_hour
                .entry(BucketSize::Hour.label(t))
                .or_default()
                .push(node);
        }
    }
    if by_hour.is_empty() {
        return Vec::new();
    }

    let share = (limit / by_hour.len()).max(1);
    let mut picked: Vec<GraphNode> = Vec::with_capacity(limit);
    let mut leftovers: Vec<Vec<GraphNode>> = Vec::new();

    // Pass 1: equal share per hour, most recent hour first.
    for (_, mut nodes) in by_hour.into_iter().rev() {
        let take = share.min(nodes.len()).min(limit - picked.len());
        let rest = nodes.split_off(take);
        picked.extend(nodes);
        if !rest.is_empty() {
            leftovers.push(rest);
        }
        if picked.len() >= limit {
            return picked;
        }
    }

    // Pass 2: top up from the fullest hours.
    leftovers.sort_by_key(|rest| Reverse(rest.len()));
    for rest in leftovers {
        for node in rest {
            if picked.len() >= limit {
                return picked;
            }
            picked.push(node);
        }
    }

    picked
}

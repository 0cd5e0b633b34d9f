//! Remark processing utilities
//!
//! Node names from different providers routinely collide ("HK 01" is a
//! favourite), while Clash requires every proxy name to be unique.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};

use super::group::RESERVED_NAMES;
use crate::models::{FeedResult, Node};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Return `base`, or `base` followed by the first free counter (` 2`, ` 3`, ...)
/// if it is already taken, and mark the result as taken.
pub fn unique_name(base: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut counter = 2;
    while taken.contains(&candidate) {
        candidate = format!("{} {}", base, counter);
        counter += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// Relabel nodes whose names appear more than once across all feeds
///
/// Every node whose name is shared becomes `"{name} (Subscription {n})"`,
/// `n` being the 1-based feed position. Names that still collide (the same
/// name repeated inside one feed) get a running counter, and so do nodes
/// named after a built-in policy or group such as `DIRECT`.
///
/// # Returns
/// The renamed nodes, grouped per feed in input order
pub fn dedup_node_names(results: &[FeedResult]) -> Vec<Vec<Node>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for node in results.iter().flat_map(|r| r.nodes.iter()) {
        *counts.entry(node.name.as_str()).or_default() += 1;
    }

    let mut taken: HashSet<String> = RESERVED_NAMES.iter().map(|s| s.to_string()).collect();
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            result
                .nodes
                .iter()
                .map(|node| {
                    let base = if counts.get(node.name.as_str()).copied().unwrap_or(0) > 1 {
                        format!("{} (Subscription {})", node.name, index + 1)
                    } else {
                        node.name.clone()
                    };
                    let mut node = node.clone();
                    node.set_name(unique_name(&base, &mut taken));
                    node
                })
                .collect()
        })
        .collect()
}

/// Format a byte count as gibibytes with one decimal, e.g. `1.5GB`
pub fn format_bytes(bytes: u64) -> String {
    format!("{:.1}GB", bytes as f64 / GIB)
}

/// Format a unix expiry as `YYYY-MM-DD` in the given UTC offset
///
/// `0` and timestamps outside the calendar range render as `unknown`.
pub fn format_expire(expire: u64, utc_offset_hours: i32) -> String {
    if expire == 0 {
        return "unknown".to_string();
    }
    let offset = FixedOffset::east_opt(utc_offset_hours.saturating_mul(3600))
        .or_else(|| FixedOffset::east_opt(0));
    let datetime = i64::try_from(expire)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    match (datetime, offset) {
        (Some(datetime), Some(offset)) => datetime
            .with_timezone(&offset)
            .format("%Y-%m-%d")
            .to_string(),
        _ => "unknown".to_string(),
    }
}

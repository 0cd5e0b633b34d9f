//! Public dashboard summary
//!
//! Only usage numbers and node counts leave this module; feed URLs carry
//! credentials and are never part of the summary.

use serde::{Deserialize, Serialize};

use crate::models::{FeedResult, UsageInfo};

/// One dashboard card per usable feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// 1-based position among the usable feeds
    pub id: usize,
    pub name: String,
    pub info: UsageInfo,
    #[serde(rename = "nodeCount")]
    pub node_count: usize,
}

/// Display label of the feed at 1-based position `id`
pub fn feed_label(name: &str, id: usize) -> String {
    if name.trim().is_empty() {
        format!("Subscription {}", id)
    } else {
        name.to_string()
    }
}

/// Build the public summary of the given feeds
pub fn to_summary(results: &[FeedResult]) -> Vec<SummaryEntry> {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| SummaryEntry {
            id: index + 1,
            name: feed_label(&result.name, index + 1),
            info: result.info,
            node_count: result.nodes.len(),
        })
        .collect()
}

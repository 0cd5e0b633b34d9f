//! Group generation utilities
//!
//! Builds the fixed selector layout of the generated profile: a top-level
//! strategy switch, an automatic latency group, a manual picker and one
//! selector per feed.

use std::collections::HashSet;

use super::remark::{format_bytes, format_expire, unique_name};
use crate::generator::summary::feed_label;
use crate::models::{Node, ProxyGroupConfig, ProxyGroupConfigs, UsageInfo};

pub const PROXY_SELECT_GROUP: &str = "🚀 Proxy Select";
pub const AUTO_SELECT_GROUP: &str = "♻️ Auto Select";
pub const MANUAL_SELECT_GROUP: &str = "🤚 Manual Select";
pub const ALL_NODES_GROUP: &str = "📃 All Nodes";
pub const DIRECT: &str = "DIRECT";
pub const REJECT: &str = "REJECT";

/// Names owned by the profile itself; no proxy or feed group may use them
pub const RESERVED_NAMES: &[&str] = &[
    PROXY_SELECT_GROUP,
    AUTO_SELECT_GROUP,
    MANUAL_SELECT_GROUP,
    ALL_NODES_GROUP,
    DIRECT,
    REJECT,
];

/// Latency test settings for the automatic selection group
#[derive(Debug, Clone)]
pub struct LatencyTest {
    pub url: String,
    pub interval: u32,
}

/// Name of the selector of one feed: `🔰 {label} | 📊{used}/{total} | ⌛{expiry}`
pub fn feed_group_name(label: &str, info: &UsageInfo, utc_offset_hours: i32) -> String {
    format!(
        "🔰 {} | 📊{}/{} | ⌛{}",
        label,
        format_bytes(info.used()),
        format_bytes(info.total),
        format_expire(info.expire, utc_offset_hours)
    )
}

/// Generate the proxy groups for the already renamed nodes of each feed
///
/// # Arguments
/// * `feeds` - Feed name, usage and renamed nodes, in feed order
/// * `test` - Latency test used by the automatic group
/// * `utc_offset_hours` - Offset used to print expiry dates
///
/// # Returns
/// No groups at all when there are no nodes, so the profile never refers
/// to an empty selector.
pub fn generate_groups(
    feeds: &[(&str, UsageInfo, &[Node])],
    test: &LatencyTest,
    utc_offset_hours: i32,
) -> ProxyGroupConfigs {
    let all_names: Vec<String> = feeds
        .iter()
        .flat_map(|(_, _, nodes)| nodes.iter().map(|n| n.name.clone()))
        .collect();
    if all_names.is_empty() {
        return Vec::new();
    }

    let mut taken: HashSet<String> = RESERVED_NAMES.iter().map(|s| s.to_string()).collect();
    taken.extend(all_names.iter().cloned());

    let feed_groups: Vec<ProxyGroupConfig> = feeds
        .iter()
        .enumerate()
        .filter(|(_, (_, _, nodes))| !nodes.is_empty())
        .map(|(index, (name, info, nodes))| {
            let label = feed_label(name, index + 1);
            let group_name = unique_name(
                &feed_group_name(&label, info, utc_offset_hours),
                &mut taken,
            );
            ProxyGroupConfig::select(group_name, nodes.iter().map(|n| n.name.clone()).collect())
        })
        .collect();

    let mut manual = vec![ALL_NODES_GROUP.to_string()];
    manual.extend(feed_groups.iter().map(|g| g.name.clone()));

    let mut groups = vec![
        ProxyGroupConfig::select(
            PROXY_SELECT_GROUP,
            vec![
                AUTO_SELECT_GROUP.to_string(),
                MANUAL_SELECT_GROUP.to_string(),
                DIRECT.to_string(),
            ],
        ),
        ProxyGroupConfig::url_test(
            AUTO_SELECT_GROUP,
            all_names.clone(),
            test.url.clone(),
            test.interval,
        ),
        ProxyGroupConfig::select(MANUAL_SELECT_GROUP, manual),
        ProxyGroupConfig::select(ALL_NODES_GROUP, all_names),
    ];
    groups.extend(feed_groups);
    groups
}

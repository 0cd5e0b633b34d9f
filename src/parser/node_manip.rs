use crate::models::Node;

/// Name fragments that mark promotional or informational entries rather
/// than real proxies (traffic left, expiry notices, shop links, ...).
pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &[
    "剩余",
    "过期",
    "到期",
    "流量",
    "expire",
    "traffic",
    "官网",
    "（看这里）",
    ".ink",
    "套餐",
    "网址",
    "链接",
    "订阅",
    "更新",
    "t.me",
    ".com",
    "邀请",
    "返利",
    "新用户",
    "remaining",
    "official site",
    "subscribe",
    "invite",
    "new user",
];

/// The default denylist as owned strings, as stored in the settings
pub fn default_exclude_keywords() -> Vec<String> {
    DEFAULT_EXCLUDE_KEYWORDS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Filters nodes, keeping only usable ones whose names avoid the denylist
///
/// # Arguments
/// * `nodes` - Nodes decoded from a single feed
/// * `exclude_keywords` - Case-insensitive name fragments to drop; empty disables name filtering
///
/// # Returns
/// The surviving nodes, in their original order
pub fn filter_nodes(nodes: Vec<Node>, exclude_keywords: &[String]) -> Vec<Node> {
    let keywords: Vec<String> = exclude_keywords
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| k.to_lowercase())
        .collect();

    nodes
        .into_iter()
        .filter(|node| !should_ignore(node, &keywords))
        .collect()
}

/// Determines if a node should be dropped
///
/// `keywords` are expected to be lowercase already.
pub fn should_ignore(node: &Node, keywords: &[String]) -> bool {
    if !node.is_usable() {
        return true;
    }
    let name = node.name.to_lowercase();
    keywords.iter().any(|keyword| name.contains(keyword.as_str()))
}

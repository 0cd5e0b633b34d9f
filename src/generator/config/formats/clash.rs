//! Clash profile generation
//!
//! Merges every usable feed into one Clash document: all proxies, the
//! selector layout from [`generate_groups`] and a single catch-all rule.
//! The document doubles as a subscription feed itself, so it travels with a
//! `Subscription-Userinfo` header summarizing the combined quota.

use serde_json::{Map, Value};

use crate::generator::config::group::{generate_groups, LatencyTest, DIRECT, PROXY_SELECT_GROUP};
use crate::generator::config::remark::dedup_node_names;
use crate::models::{FeedResult, Node, UsageInfo};
use crate::parser::explodes::vmess_to_clash;
use crate::parser::format_usage_header;
use crate::utils::number::MAX_REASONABLE_VALUE;
use crate::utils::yaml::dump_quoted;

/// Profile level options of the generated document and its headers
#[derive(Debug, Clone)]
pub struct ProfileOptions {
    pub title: String,
    pub support_url: String,
    pub web_page_url: String,
    /// Suggested client refresh period in hours
    pub update_interval: u32,
    pub filename: String,
    /// Offset used to print expiry dates in group names
    pub utc_offset_hours: i32,
    pub http_port: u16,
    pub socks_port: u16,
    pub allow_lan: bool,
    pub test_url: String,
    pub test_interval: u32,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            title: "NodePin".to_string(),
            support_url: String::new(),
            web_page_url: String::new(),
            update_interval: 24,
            filename: "clash.yaml".to_string(),
            utc_offset_hours: 8,
            http_port: 7890,
            socks_port: 7891,
            allow_lan: true,
            test_url: "http://www.gstatic.com/generate_204".to_string(),
            test_interval: 300,
        }
    }
}

/// A generated Clash document together with the combined usage of its feeds
#[derive(Debug, Clone)]
pub struct RoutingDocument {
    pub config: Value,
    pub usage: UsageInfo,
}

impl RoutingDocument {
    /// Serialize the document as force-quoted YAML
    pub fn render(&self) -> String {
        dump_quoted(&self.config)
    }

    /// Response headers announcing the document to proxy clients
    pub fn headers(&self, options: &ProfileOptions) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Content-Type", "text/plain; charset=utf-8".to_string()),
            ("Subscription-Userinfo", format_usage_header(&self.usage)),
            ("Profile-Update-Interval", options.update_interval.to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename={}", options.filename),
            ),
        ];
        if !options.title.is_empty() {
            headers.push(("Profile-Title", options.title.clone()));
        }
        if !options.support_url.is_empty() {
            headers.push(("Support-URL", options.support_url.clone()));
        }
        if !options.web_page_url.is_empty() {
            headers.push(("Profile-Web-Page-URL", options.web_page_url.clone()));
        }
        headers
    }
}

/// Render a node as a Clash proxy entry
///
/// Nodes decoded from `vmess://` links still carry the share-link JSON and
/// are mapped to Clash keys; every other node already holds a Clash entry.
pub fn clash_proxy(node: &Node) -> Map<String, Value> {
    if node.proxy_type == "vmess" && !node.settings.contains_key("uuid") {
        return vmess_to_clash(&node.name, &node.server, node.port, &node.settings);
    }
    let mut proxy = node.settings.clone();
    proxy.insert("name".to_string(), Value::String(node.name.clone()));
    proxy
}

/// Combined usage: sums of traffic and quota, earliest expiry still ahead of `now`
pub fn aggregate_usage(results: &[FeedResult], now: i64) -> UsageInfo {
    let sum = |field: fn(&UsageInfo) -> u64| {
        results
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(field(&r.info)))
            .min(MAX_REASONABLE_VALUE)
    };
    let expire = results
        .iter()
        .map(|r| r.info.expire)
        .filter(|expire| *expire > 0 && i64::try_from(*expire).map_or(true, |e| e > now))
        .min()
        .unwrap_or(0);

    UsageInfo {
        upload: sum(|i| i.upload),
        download: sum(|i| i.download),
        total: sum(|i| i.total),
        expire,
    }
}

/// Build the Clash document for the given feeds
///
/// # Arguments
/// * `results` - Usable feeds, in display order
/// * `options` - Profile options
/// * `now` - Current unix time, used to skip expiries already in the past
pub fn to_routing_doc(results: &[FeedResult], options: &ProfileOptions, now: i64) -> RoutingDocument {
    let renamed = dedup_node_names(results);

    let proxies: Vec<Value> = renamed
        .iter()
        .flatten()
        .map(|node| Value::Object(clash_proxy(node)))
        .collect();

    let feeds: Vec<(&str, UsageInfo, &[Node])> = results
        .iter()
        .zip(renamed.iter())
        .map(|(result, nodes)| (result.name.as_str(), result.info, nodes.as_slice()))
        .collect();
    let test = LatencyTest {
        url: options.test_url.clone(),
        interval: options.test_interval,
    };
    let groups = generate_groups(&feeds, &test, options.utc_offset_hours);

    let rule = if groups.is_empty() {
        format!("MATCH,{}", DIRECT)
    } else {
        format!("MATCH,{}", PROXY_SELECT_GROUP)
    };

    let mut config = Map::new();
    config.insert("port".to_string(), Value::from(options.http_port));
    config.insert("socks-port".to_string(), Value::from(options.socks_port));
    config.insert("allow-lan".to_string(), Value::Bool(options.allow_lan));
    config.insert("mode".to_string(), Value::String("rule".to_string()));
    config.insert("log-level".to_string(), Value::String("info".to_string()));
    config.insert("proxies".to_string(), Value::Array(proxies));
    config.insert(
        "proxy-groups".to_string(),
        Value::Array(groups.iter().map(|g| g.to_clash_value()).collect()),
    );
    config.insert(
        "rules".to_string(),
        Value::Array(vec![Value::String(rule)]),
    );

    RoutingDocument {
        config: Value::Object(config),
        usage: aggregate_usage(results, now),
    }
}

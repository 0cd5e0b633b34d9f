use serde_json::Value;

use crate::models::Node;
use crate::parser::DecodeError;

/// Explode a single proxy link into a Node
///
/// Dispatches on the scheme prefix. Unsupported schemes yield `Ok(None)` so
/// the caller can skip the line without treating it as a failure.
pub fn explode(link: &str) -> Result<Option<Node>, DecodeError> {
    let link = link.trim();

    if link.starts_with("vmess://") {
        super::vmess::explode_vmess(link).map(Some)
    } else if link.starts_with("ss://") {
        super::ss::explode_ss(link).map(Some)
    } else if link.starts_with("trojan://") {
        super::trojan::explode_trojan(link).map(Some)
    } else {
        Ok(None)
    }
}

/// Read a JSON/YAML scalar as display text.
///
/// Empty strings count as missing; numbers are rendered in decimal.
pub fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Fallback display name for links without a remark
pub fn default_remark(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}

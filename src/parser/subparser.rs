use log::debug;

use crate::models::Node;
use crate::parser::explodes::{explode, explode_clash};
use crate::parser::DecodeError;
use crate::utils::base64::base64_decode;

/// Marker that identifies a structured (Clash YAML) feed body
const CLASH_MARKER: &str = "proxies:";

/// Decode a raw feed body into nodes
///
/// A body containing `proxies:` is parsed as a Clash YAML document and a
/// malformed document fails the whole feed. Anything else is treated as a
/// base64 encoded URI list; a body that does not decode as base64 is read
/// as a plain URI list instead.
///
/// # Arguments
/// * `body` - Response body of a subscription feed
///
/// # Returns
/// * Nodes in document order, before filtering
pub fn decode_nodes(body: &str) -> Result<Vec<Node>, DecodeError> {
    if body.contains(CLASH_MARKER) {
        return explode_clash(body);
    }

    let decoded = match base64_decode(body) {
        Some(text) => text,
        None => {
            debug!("Feed body is not base64, reading it as a plain link list");
            body.to_string()
        }
    };
    Ok(explode_sub(&decoded))
}

/// Explode a newline separated list of proxy links
///
/// Each line is handled on its own: malformed or unsupported lines are
/// dropped and never abort the rest of the list.
pub fn explode_sub(sub: &str) -> Vec<Node> {
    sub.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match explode(line) {
            Ok(Some(node)) => Some(node),
            Ok(None) => {
                debug!("Ignoring unsupported link: {}", line);
                None
            }
            Err(e) => {
                debug!("Dropping malformed link: {}", e);
                None
            }
        })
        .collect()
}

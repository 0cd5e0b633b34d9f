use log::debug;
use serde_json::{Map, Value};

use super::common::value_text;
use crate::models::Node;
use crate::parser::DecodeError;
use crate::utils::number::coerce_port;

/// Parse a Clash YAML configuration into a vector of Nodes
///
/// Only the top-level `proxies` sequence is read. A document without one
/// yields an empty list, and entries missing a name or type are skipped.
/// Each node keeps the complete proxy mapping as its settings, with `<<`
/// merge keys already expanded.
pub fn explode_clash(content: &str) -> Result<Vec<Node>, DecodeError> {
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    yaml.apply_merge()?;

    let proxies = match yaml.get("proxies") {
        Some(serde_yaml::Value::Sequence(seq)) => seq,
        _ => return Ok(Vec::new()),
    };

    let nodes = proxies
        .iter()
        .filter_map(|proxy| {
            let node = parse_clash_proxy(proxy);
            if node.is_none() {
                debug!("Skipping malformed Clash proxy entry");
            }
            node
        })
        .collect();

    Ok(nodes)
}

/// Parse a single proxy from Clash YAML
fn parse_clash_proxy(proxy: &serde_yaml::Value) -> Option<Node> {
    let settings: Map<String, Value> = match serde_json::to_value(proxy).ok()? {
        Value::Object(map) => map,
        _ => return None,
    };

    let name = value_text(settings.get("name"))?;
    let proxy_type = value_text(settings.get("type"))?;
    let server = value_text(settings.get("server")).unwrap_or_default();
    let port = coerce_port(settings.get("port"));

    Some(Node::new(name, proxy_type, server, port, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explode_clash_proxies() {
        let content = r#"
port: 7890
proxies:
  - name: "HK 01"
    type: ss
    server: hk.example.com
    port: 8388
    cipher: aes-128-gcm
    password: pw
  - name: US
    type: VMess
    server: us.example.com
    port: "443"
    uuid: 00000000-0000-0000-0000-000000000000
    alterId: 0
"#;
        let nodes = explode_clash(content).unwrap();
        assert_eq!(nodes.len(), 2);

        assert_eq!(nodes[0].name, "HK 01");
        assert_eq!(nodes[0].port, 8388);
        assert_eq!(nodes[0].settings["cipher"], json!("aes-128-gcm"));

        assert_eq!(nodes[1].proxy_type, "vmess");
        assert_eq!(nodes[1].port, 443);
        assert_eq!(nodes[1].settings["alterId"], json!(0));
    }

    #[test]
    fn test_explode_clash_skips_incomplete_entries() {
        let content = r#"
proxies:
  - type: ss
    server: a.example.com
    port: 1
  - name: no-type
    server: b.example.com
    port: 2
  - plain string
  - name: bare
    type: trojan
"#;
        let nodes = explode_clash(content).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name, "bare");
        assert!(!nodes[0].is_usable());
    }

    #[test]
    fn test_explode_clash_merge_keys() {
        let content = r#"
base: &base
  type: ss
  server: hk.example.com
  port: 8388
  cipher: aes-128-gcm
  password: pw
proxies:
  - <<: *base
    name: HK 01
  - <<: *base
    name: HK 02
    port: 8389
"#;
        let nodes = explode_clash(content).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.is_usable()));
        assert_eq!(nodes[0].name, "HK 01");
        assert_eq!(nodes[0].port, 8388);
        assert_eq!(nodes[1].port, 8389);
        assert_eq!(nodes[1].settings["cipher"], json!("aes-128-gcm"));
        assert!(nodes[1].settings.get("<<").is_none());
    }

    #[test]
    fn test_explode_clash_without_proxies() {
        assert!(explode_clash("proxies:\n").unwrap().is_empty());
        assert!(explode_clash("proxies: 3\nrules: []").unwrap().is_empty());
        assert!(explode_clash("mode: rule").unwrap().is_empty());
    }

    #[test]
    fn test_explode_clash_invalid_yaml() {
        assert!(matches!(
            explode_clash("proxies: [unclosed"),
            Err(DecodeError::Yaml(_))
        ));
    }
}

use serde_json::{Map, Value};

use super::common::default_remark;
use crate::models::Node;
use crate::parser::DecodeError;
use crate::utils::base64::base64_decode;
use crate::utils::url::url_decode;

/// Parse a Shadowsocks link into a Node
///
/// Accepts the SIP002 form `ss://base64(method:password)@host:port/?plugin=..#name`
/// (percent-encoded plain `method:password` user info is also accepted) and
/// the legacy form `ss://base64(method:password@host:port)#name`.
/// The node settings are a Clash `ss` proxy.
pub fn explode_ss(ss: &str) -> Result<Node, DecodeError> {
    let invalid = |reason: &str| DecodeError::Uri(format!("{}: {}", reason, ss));

    let mut content = ss
        .trim()
        .strip_prefix("ss://")
        .ok_or_else(|| invalid("not a shadowsocks link"))?
        .replace("/?", "?");

    // Fragment holds the remark
    let mut remark = String::new();
    if let Some(hash_pos) = content.find('#') {
        remark = url_decode(&content[hash_pos + 1..]);
        content.truncate(hash_pos);
    }

    let mut plugin = String::new();
    if let Some(query_pos) = content.find('?') {
        for (key, value) in url::form_urlencoded::parse(content[query_pos + 1..].as_bytes()) {
            if key == "plugin" {
                plugin = value.into_owned();
            }
        }
        content.truncate(query_pos);
    }
    let content = content.trim_end_matches('/');

    let (method, password, server, port) = match content.rsplit_once('@') {
        // SIP002
        Some((secret, server_port)) => {
            let secret = base64_decode(secret)
                .filter(|decoded| decoded.contains(':'))
                .unwrap_or_else(|| url_decode(secret));
            let (method, password) = split_secret(&secret).ok_or_else(|| invalid("missing method"))?;
            let (server, port) = split_server_port(server_port).ok_or_else(|| invalid("bad address"))?;
            (method, password, server, port)
        }
        // Legacy
        None => {
            let decoded = base64_decode(content)
                .ok_or_else(|| DecodeError::Base64("invalid shadowsocks payload".to_string()))?;
            let (secret, server_port) = decoded
                .rsplit_once('@')
                .ok_or_else(|| invalid("missing address"))?;
            let (method, password) = split_secret(secret).ok_or_else(|| invalid("missing method"))?;
            let (server, port) = split_server_port(server_port).ok_or_else(|| invalid("bad address"))?;
            (method, password, server, port)
        }
    };

    if remark.is_empty() {
        remark = default_remark(&server, port);
    }

    let mut proxy = Map::new();
    proxy.insert("name".to_string(), Value::String(remark.clone()));
    proxy.insert("type".to_string(), Value::String("ss".to_string()));
    proxy.insert("server".to_string(), Value::String(server.clone()));
    proxy.insert("port".to_string(), Value::from(port));
    proxy.insert("cipher".to_string(), Value::String(method));
    proxy.insert("password".to_string(), Value::String(password));
    proxy.insert("udp".to_string(), Value::Bool(true));
    if !plugin.is_empty() {
        insert_plugin(&mut proxy, &plugin);
    }

    Ok(Node::new(remark, "ss", server, port, proxy))
}

fn split_secret(secret: &str) -> Option<(String, String)> {
    let (method, password) = secret.split_once(':')?;
    if method.is_empty() {
        return None;
    }
    Some((method.to_string(), password.to_string()))
}

/// Split `host:port`, unwrapping bracketed IPv6 hosts
fn split_server_port(server_port: &str) -> Option<(String, u16)> {
    let (host, port) = server_port.trim().rsplit_once(':')?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let port = port.parse::<u16>().ok().filter(|p| *p != 0)?;
    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), port))
}

/// Translate a SIP003 plugin string (`name;key=value;flag`) into Clash
/// `plugin` / `plugin-opts` fields
fn insert_plugin(proxy: &mut Map<String, Value>, plugin: &str) {
    let mut parts = plugin.split(';');
    let name = parts.next().unwrap_or_default();
    let options: Vec<(&str, &str)> = parts
        .filter(|p| !p.is_empty())
        .map(|p| p.split_once('=').unwrap_or((p, "")))
        .collect();
    let option = |key: &str| {
        options
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    };

    let mut opts = Map::new();
    match name {
        "obfs-local" | "simple-obfs" | "obfs" => {
            proxy.insert("plugin".to_string(), Value::String("obfs".to_string()));
            if let Some(mode) = option("obfs") {
                opts.insert("mode".to_string(), Value::String(mode));
            }
            if let Some(host) = option("obfs-host") {
                opts.insert("host".to_string(), Value::String(host));
            }
        }
        "v2ray-plugin" => {
            proxy.insert(
                "plugin".to_string(),
                Value::String("v2ray-plugin".to_string()),
            );
            let mode = option("mode").unwrap_or_else(|| "websocket".to_string());
            opts.insert("mode".to_string(), Value::String(mode));
            if let Some(host) = option("host") {
                opts.insert("host".to_string(), Value::String(host));
            }
            if let Some(path) = option("path") {
                opts.insert("path".to_string(), Value::String(path));
            }
            if option("tls").is_some() {
                opts.insert("tls".to_string(), Value::Bool(true));
            }
        }
        other => {
            proxy.insert("plugin".to_string(), Value::String(other.to_string()));
            for (key, value) in &options {
                opts.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }
    proxy.insert("plugin-opts".to_string(), Value::Object(opts));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explode_ss_legacy_format() {
        // Legacy format: ss://base64(method:password@server:port)
        let legacy_ss = "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpwYXNzd29yZEAxMjcuMC4wLjE6ODA4MA==";
        let node = explode_ss(legacy_ss).unwrap();

        assert_eq!(node.proxy_type, "ss");
        assert_eq!(node.server, "127.0.0.1");
        assert_eq!(node.port, 8080);
        assert_eq!(node.name, "127.0.0.1:8080");
        assert_eq!(node.settings["cipher"], json!("chacha20-ietf-poly1305"));
        assert_eq!(node.settings["password"], json!("password"));
    }

    #[test]
    fn test_explode_ss_sip002_format() {
        // SIP002 format: ss://base64(method:password)@server:port
        let sip002_ss = "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpwYXNzd29yZA==@example.com:8388";
        let node = explode_ss(sip002_ss).unwrap();

        assert_eq!(node.server, "example.com");
        assert_eq!(node.port, 8388);
        assert_eq!(node.settings["cipher"], json!("chacha20-ietf-poly1305"));
        assert_eq!(node.settings["password"], json!("password"));
    }

    #[test]
    fn test_explode_ss_with_fragment() {
        let ss_with_fragment =
            "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpwYXNzd29yZA==@example.com:8388#%F0%9F%87%AD%F0%9F%87%B0%20HK";
        let node = explode_ss(ss_with_fragment).unwrap();

        assert_eq!(node.name, "🇭🇰 HK");
        assert_eq!(node.settings["name"], json!("🇭🇰 HK"));
    }

    #[test]
    fn test_explode_ss_with_plugin() {
        let ss_with_plugin = "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpwYXNzd29yZA==@example.com:8388/?plugin=obfs-local%3Bobfs%3Dhttp%3Bobfs-host%3Dexample.com#Example%20Plugin";
        let node = explode_ss(ss_with_plugin).unwrap();

        assert_eq!(node.name, "Example Plugin");
        assert_eq!(node.settings["plugin"], json!("obfs"));
        assert_eq!(
            node.settings["plugin-opts"],
            json!({"mode": "http", "host": "example.com"})
        );
    }

    #[test]
    fn test_explode_ss_plain_userinfo_and_ipv6() {
        let node = explode_ss("ss://2022-blake3-aes-128-gcm:c2VjcmV0%3D@[2001:db8::1]:443#v6").unwrap();
        assert_eq!(node.server, "2001:db8::1");
        assert_eq!(node.port, 443);
        assert_eq!(node.settings["cipher"], json!("2022-blake3-aes-128-gcm"));
        assert_eq!(node.settings["password"], json!("c2VjcmV0="));
    }

    #[test]
    fn test_explode_ss_invalid() {
        assert!(explode_ss("ss://").is_err());
        assert!(explode_ss("ss://!!!").is_err());
        assert!(explode_ss("ss://YWVzLTI1Ni1nY206cGFzcw==@example.com:notaport").is_err());
        assert!(explode_ss("ss://YWVzLTI1Ni1nY206cGFzcw==@example.com:0").is_err());
    }
}

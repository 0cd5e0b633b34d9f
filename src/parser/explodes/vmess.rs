use serde_json::{Map, Value};

use super::common::{default_remark, value_text};
use crate::models::Node;
use crate::parser::DecodeError;
use crate::utils::base64::base64_decode;
use crate::utils::number::coerce_port;

/// Parse a VMess link (`vmess://` + base64 JSON) into a Node
///
/// The display name comes from `ps`, falling back to `name` and then to
/// `host:port`; the server is `add`. The whole decoded object is kept as the
/// node settings.
pub fn explode_vmess(vmess: &str) -> Result<Node, DecodeError> {
    let encoded = vmess
        .trim()
        .strip_prefix("vmess://")
        .ok_or_else(|| DecodeError::Uri(format!("not a vmess link: {}", vmess)))?;

    let decoded = base64_decode(encoded)
        .ok_or_else(|| DecodeError::Base64("invalid vmess payload".to_string()))?;

    let config = match serde_json::from_str::<Value>(&decoded)? {
        Value::Object(config) => config,
        _ => return Err(DecodeError::Uri("vmess payload is not an object".to_string())),
    };

    let server = value_text(config.get("add")).unwrap_or_default();
    let port = coerce_port(config.get("port"));
    let name = value_text(config.get("ps"))
        .or_else(|| value_text(config.get("name")))
        .unwrap_or_else(|| default_remark(&server, port));

    Ok(Node::new(name, "vmess", server, port, config))
}

/// Map the fields of a decoded VMess JSON object onto a Clash `vmess` proxy
pub fn vmess_to_clash(name: &str, server: &str, port: u16, config: &Map<String, Value>) -> Map<String, Value> {
    let text = |key: &str| value_text(config.get(key)).unwrap_or_default();

    let mut proxy = Map::new();
    proxy.insert("name".to_string(), Value::String(name.to_string()));
    proxy.insert("type".to_string(), Value::String("vmess".to_string()));
    proxy.insert("server".to_string(), Value::String(server.to_string()));
    proxy.insert("port".to_string(), Value::from(port));
    proxy.insert("uuid".to_string(), Value::String(text("id")));

    let alter_id = text("aid").parse::<u32>().unwrap_or(0);
    proxy.insert("alterId".to_string(), Value::from(alter_id));

    let cipher = match text("scy") {
        scy if scy.is_empty() => "auto".to_string(),
        scy => scy,
    };
    proxy.insert("cipher".to_string(), Value::String(cipher));
    proxy.insert("udp".to_string(), Value::Bool(true));

    if text("tls") == "tls" {
        proxy.insert("tls".to_string(), Value::Bool(true));
        let sni = text("sni");
        if !sni.is_empty() {
            proxy.insert("servername".to_string(), Value::String(sni));
        }
    }

    let host = text("host");
    let path = text("path");
    match text("net").as_str() {
        "ws" => {
            proxy.insert("network".to_string(), Value::String("ws".to_string()));
            let mut opts = Map::new();
            if !path.is_empty() {
                opts.insert("path".to_string(), Value::String(path));
            }
            if !host.is_empty() {
                let mut headers = Map::new();
                headers.insert("Host".to_string(), Value::String(host));
                opts.insert("headers".to_string(), Value::Object(headers));
            }
            proxy.insert("ws-opts".to_string(), Value::Object(opts));
        }
        "grpc" => {
            proxy.insert("network".to_string(), Value::String("grpc".to_string()));
            let mut opts = Map::new();
            opts.insert("grpc-service-name".to_string(), Value::String(path));
            proxy.insert("grpc-opts".to_string(), Value::Object(opts));
        }
        "h2" => {
            proxy.insert("network".to_string(), Value::String("h2".to_string()));
            let mut opts = Map::new();
            if !host.is_empty() {
                opts.insert(
                    "host".to_string(),
                    Value::Array(vec![Value::String(host)]),
                );
            }
            opts.insert("path".to_string(), Value::String(path));
            proxy.insert("h2-opts".to_string(), Value::Object(opts));
        }
        _ => {}
    }

    proxy
}

use std::collections::HashMap;

use serde_json::{Map, Value};
use url::Url;

use super::common::default_remark;
use crate::models::Node;
use crate::parser::DecodeError;
use crate::utils::url::url_decode;

/// Parse a Trojan link into a Node
///
/// `trojan://password@host:port?sni=..&type=ws&path=..#name`. The port
/// defaults to 443 and the node settings are a Clash `trojan` proxy.
pub fn explode_trojan(trojan: &str) -> Result<Node, DecodeError> {
    let trojan = trojan.trim();
    if !trojan.starts_with("trojan://") {
        return Err(DecodeError::Uri(format!("not a trojan link: {}", trojan)));
    }

    let url = Url::parse(trojan).map_err(|e| DecodeError::Uri(format!("{}: {}", e, trojan)))?;

    let password = url_decode(url.username());
    if password.is_empty() {
        return Err(DecodeError::Uri(format!("missing password: {}", trojan)));
    }

    let host = url
        .host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']').to_string())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| DecodeError::Uri(format!("missing host: {}", trojan)))?;
    let port = url.port().unwrap_or(443);
    if port == 0 {
        return Err(DecodeError::Uri(format!("invalid port: {}", trojan)));
    }

    let params: HashMap<String, String> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let flag = |key: &str| {
        params
            .get(key)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };

    let remark = url
        .fragment()
        .map(url_decode)
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| default_remark(&host, port));

    let mut proxy = Map::new();
    proxy.insert("name".to_string(), Value::String(remark.clone()));
    proxy.insert("type".to_string(), Value::String("trojan".to_string()));
    proxy.insert("server".to_string(), Value::String(host.clone()));
    proxy.insert("port".to_string(), Value::from(port));
    proxy.insert("password".to_string(), Value::String(password));
    proxy.insert("udp".to_string(), Value::Bool(true));

    // SNI may come as either "sni" or "peer"
    if let Some(sni) = params.get("sni").or_else(|| params.get("peer")) {
        if !sni.is_empty() {
            proxy.insert("sni".to_string(), Value::String(sni.clone()));
        }
    }
    if flag("allowInsecure") {
        proxy.insert("skip-cert-verify".to_string(), Value::Bool(true));
    }

    match params.get("type").map(String::as_str) {
        Some("ws") => {
            proxy.insert("network".to_string(), Value::String("ws".to_string()));
            let mut ws_opts = Map::new();
            if let Some(path) = params.get("path") {
                ws_opts.insert("path".to_string(), Value::String(path.clone()));
            }
            if let Some(ws_host) = params.get("host") {
                let mut headers = Map::new();
                headers.insert("Host".to_string(), Value::String(ws_host.clone()));
                ws_opts.insert("headers".to_string(), Value::Object(headers));
            }
            proxy.insert("ws-opts".to_string(), Value::Object(ws_opts));
        }
        Some("grpc") => {
            proxy.insert("network".to_string(), Value::String("grpc".to_string()));
            let mut grpc_opts = Map::new();
            if let Some(service) = params.get("serviceName") {
                grpc_opts.insert(
                    "grpc-service-name".to_string(),
                    Value::String(service.clone()),
                );
            }
            proxy.insert("grpc-opts".to_string(), Value::Object(grpc_opts));
        }
        _ => {}
    }

    Ok(Node::new(remark, "trojan", host, port, proxy))
}

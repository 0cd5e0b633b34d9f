//! Canonical proxy node model
//!
//! Every feed encoding (Clash YAML entries and the `vmess://`, `ss://` and
//! `trojan://` URI forms) is normalized into a [`Node`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single proxy endpoint taken from a subscription feed.
///
/// `settings` carries the protocol specific fields untouched, the aggregator
/// never interprets them beyond re-labelling the node name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Display name chosen by the upstream operator (untrusted free text)
    pub name: String,
    /// Lowercase protocol tag, e.g. `vmess`, `ss`, `trojan`
    #[serde(rename = "type")]
    pub proxy_type: String,
    pub server: String,
    pub port: u16,
    pub settings: Map<String, Value>,
}

impl Node {
    pub fn new(
        name: impl Into<String>,
        proxy_type: impl Into<String>,
        server: impl Into<String>,
        port: u16,
        settings: Map<String, Value>,
    ) -> Self {
        Node {
            name: name.into(),
            proxy_type: proxy_type.into().to_lowercase(),
            server: server.into(),
            port,
            settings,
        }
    }

    /// A node can only be emitted when type, server and port are all present.
    pub fn is_usable(&self) -> bool {
        !self.proxy_type.is_empty() && !self.server.is_empty() && self.port != 0
    }

    /// Rename the node, keeping the `name` entry of its settings in sync.
    pub fn set_name(&mut self, name: String) {
        self.settings
            .insert("name".to_string(), Value::String(name.clone()));
        self.name = name;
    }
}

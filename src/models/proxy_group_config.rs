use serde_json::{Map, Value};

/// Type of proxy group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyGroupType {
    Select,
    URLTest,
}

impl ProxyGroupType {
    /// Get string representation of the proxy group type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyGroupType::Select => "select",
            ProxyGroupType::URLTest => "url-test",
        }
    }
}

/// Configuration for a proxy group
#[derive(Debug, Clone)]
pub struct ProxyGroupConfig {
    /// Name of the proxy group
    pub name: String,
    /// Type of the proxy group
    pub group_type: ProxyGroupType,
    /// Proxy or group names in this group
    pub proxies: Vec<String>,
    /// URL for latency testing
    pub url: String,
    /// Interval in seconds between tests
    pub interval: u32,
}

impl Default for ProxyGroupConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            group_type: ProxyGroupType::Select,
            proxies: Vec::new(),
            url: String::new(),
            interval: 0,
        }
    }
}

impl ProxyGroupConfig {
    /// Create a new proxy group config
    pub fn new(name: String, group_type: ProxyGroupType) -> Self {
        Self {
            name,
            group_type,
            ..Default::default()
        }
    }

    /// Create a `select` group over the given members
    pub fn select(name: impl Into<String>, proxies: Vec<String>) -> Self {
        Self {
            proxies,
            ..Self::new(name.into(), ProxyGroupType::Select)
        }
    }

    /// Create a `url-test` group probing `url` every `interval` seconds
    pub fn url_test(
        name: impl Into<String>,
        proxies: Vec<String>,
        url: impl Into<String>,
        interval: u32,
    ) -> Self {
        Self {
            proxies,
            url: url.into(),
            interval,
            ..Self::new(name.into(), ProxyGroupType::URLTest)
        }
    }

    /// Get string representation of the group type
    pub fn type_str(&self) -> &'static str {
        self.group_type.as_str()
    }

    /// Render the group as a Clash `proxy-groups` entry
    pub fn to_clash_value(&self) -> Value {
        let mut group = Map::new();
        group.insert("name".to_string(), Value::String(self.name.clone()));
        group.insert(
            "type".to_string(),
            Value::String(self.type_str().to_string()),
        );
        group.insert(
            "proxies".to_string(),
            Value::Array(self.proxies.iter().cloned().map(Value::String).collect()),
        );
        if self.group_type == ProxyGroupType::URLTest {
            group.insert("url".to_string(), Value::String(self.url.clone()));
            group.insert("interval".to_string(), Value::from(self.interval));
        }
        Value::Object(group)
    }
}

/// A collection of proxy group configurations
pub type ProxyGroupConfigs = Vec<ProxyGroupConfig>;

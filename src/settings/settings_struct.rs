use std::fs;
use std::sync::{Arc, LazyLock, RwLock};

use log::{debug, info};

use super::file_settings::FileSettings;
use super::SettingsError;
use crate::generator::ProfileOptions;
use crate::models::{SubscriptionSource, TotalPolicy};
use crate::parser::default_exclude_keywords;
use crate::utils::http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

pub fn default_listen_address() -> String {
    "127.0.0.1".to_string()
}

pub fn default_listen_port() -> u16 {
    25500
}

pub fn default_log_level() -> String {
    "info".to_string()
}

/// Runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_level: String,
    pub listen_address: String,
    pub listen_port: u16,

    // Fetching
    pub user_agent: String,
    pub fetch_timeout: u64,

    // Processing
    pub exclude_keywords: Vec<String>,
    pub total_policy: TotalPolicy,

    pub profile: ProfileOptions,
    pub subscriptions: Vec<SubscriptionSource>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_level: default_log_level(),
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout: DEFAULT_TIMEOUT,
            exclude_keywords: default_exclude_keywords(),
            total_policy: TotalPolicy::default(),
            profile: ProfileOptions::default(),
            subscriptions: Vec::new(),
        }
    }
}

impl Settings {
    /// Create a new settings instance with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the active settings
    pub fn current() -> Arc<Settings> {
        match GLOBAL.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Parse settings text, trying TOML first and YAML second
    pub fn load_from_content(content: &str) -> Result<Self, SettingsError> {
        let file: FileSettings = match toml::from_str(content) {
            Ok(file) => file,
            Err(toml_err) => {
                debug!("Settings are not TOML ({}), trying YAML", toml_err);
                match serde_yaml::from_str(content) {
                    Ok(file) => file,
                    // A YAML mapping that failed TOML is a YAML error, anything else a TOML one
                    Err(yaml_err) if content.contains(": ") => return Err(yaml_err.into()),
                    Err(_) => return Err(toml_err.into()),
                }
            }
        };
        Ok(Settings::from(file))
    }

    /// Read and parse a settings file
    pub fn load_from_file(path: &str) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Settings::load_from_content(&content)
    }
}

// Global settings instance
pub static GLOBAL: LazyLock<RwLock<Arc<Settings>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Settings::new())));

fn replace_global(settings: Settings) {
    let settings = Arc::new(settings);
    match GLOBAL.write() {
        Ok(mut guard) => *guard = settings,
        Err(poisoned) => *poisoned.into_inner() = settings,
    }
}

/// Update the global settings from a file
pub fn update_settings_from_file(path: &str) -> Result<(), SettingsError> {
    let settings = Settings::load_from_file(path)?;
    info!(
        "Loaded settings from {} ({} subscriptions)",
        path,
        settings.subscriptions.len()
    );
    replace_global(settings);
    Ok(())
}

/// Update the global settings from settings text
pub fn update_settings_from_content(content: &str) -> Result<(), SettingsError> {
    let settings = Settings::load_from_content(content)?;
    replace_global(settings);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.listen_port, 25500);
        assert_eq!(settings.user_agent, "clash.meta");
        assert_eq!(settings.fetch_timeout, 15);
        assert_eq!(settings.total_policy, TotalPolicy::Inflate);
        assert!(!settings.exclude_keywords.is_empty());
    }

    #[test]
    fn test_load_toml() {
        let content = r#"
listen_port = 8080
log_level = "debug"

[fetch]
user_agent = "ClashForAndroid/2.5.12"

[filter]
exclude_keywords = ["expire"]

[usage]
total_policy = "as-reported"

[profile]
title = "My Nodes"
utc_offset_hours = 0

[[subscriptions]]
name = "Main"
url = "https://a.example.com/sub"

[[subscriptions]]
url = "https://b.example.com/sub"

[[subscriptions]]
name = "blank"
url = "  "
"#;
        let settings = Settings::load_from_content(content).unwrap();
        assert_eq!(settings.listen_port, 8080);
        assert_eq!(settings.listen_address, "127.0.0.1");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.user_agent, "ClashForAndroid/2.5.12");
        assert_eq!(settings.fetch_timeout, 15);
        assert_eq!(settings.exclude_keywords, vec!["expire"]);
        assert_eq!(settings.total_policy, TotalPolicy::AsReported);
        assert_eq!(settings.profile.title, "My Nodes");
        assert_eq!(settings.profile.utc_offset_hours, 0);
        assert_eq!(settings.profile.http_port, 7890);
        assert_eq!(settings.subscriptions.len(), 2);
        assert_eq!(settings.subscriptions[1].name, "");
    }

    #[test]
    fn test_load_yaml() {
        let content = r#"
listen_address: 0.0.0.0
fetch:
  timeout_secs: 30
subscriptions:
  - name: Main
    url: https://a.example.com/sub
"#;
        let settings = Settings::load_from_content(content).unwrap();
        assert_eq!(settings.listen_address, "0.0.0.0");
        assert_eq!(settings.fetch_timeout, 30);
        assert_eq!(settings.subscriptions[0].name, "Main");
    }

    #[test]
    fn test_load_invalid() {
        assert!(matches!(
            Settings::load_from_content("listen_port: [1"),
            Err(SettingsError::Yaml(_))
        ));
        assert!(matches!(
            Settings::load_from_content("listen_port = "),
            Err(SettingsError::Toml(_))
        ));
    }
}

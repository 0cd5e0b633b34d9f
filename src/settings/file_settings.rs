use serde::{Deserialize, Serialize};

use crate::generator::ProfileOptions;
use crate::models::{SubscriptionSource, TotalPolicy};
use crate::parser::default_exclude_keywords;
use crate::utils::http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

use super::settings_struct::{default_listen_address, default_listen_port, default_log_level, Settings};

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

/// `[fetch]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

/// `[filter]` section; leaving `exclude_keywords` out keeps the built-in list
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterSection {
    pub exclude_keywords: Option<Vec<String>>,
}

/// `[usage]` section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UsageSection {
    pub total_policy: TotalPolicy,
}

/// `[profile]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSection {
    pub title: String,
    pub support_url: String,
    pub web_page_url: String,
    pub update_interval: u32,
    pub filename: String,
    pub utc_offset_hours: i32,
    pub http_port: u16,
    pub socks_port: u16,
    pub allow_lan: bool,
    pub test_url: String,
    pub test_interval: u32,
}

impl Default for ProfileSection {
    fn default() -> Self {
        let options = ProfileOptions::default();
        Self {
            title: options.title,
            support_url: options.support_url,
            web_page_url: options.web_page_url,
            update_interval: options.update_interval,
            filename: options.filename,
            utc_offset_hours: options.utc_offset_hours,
            http_port: options.http_port,
            socks_port: options.socks_port,
            allow_lan: options.allow_lan,
            test_url: options.test_url,
            test_interval: options.test_interval,
        }
    }
}

impl From<ProfileSection> for ProfileOptions {
    fn from(section: ProfileSection) -> Self {
        ProfileOptions {
            title: section.title,
            support_url: section.support_url,
            web_page_url: section.web_page_url,
            update_interval: section.update_interval,
            filename: section.filename,
            utc_offset_hours: section.utc_offset_hours,
            http_port: section.http_port,
            socks_port: section.socks_port,
            allow_lan: section.allow_lan,
            test_url: section.test_url,
            test_interval: section.test_interval,
        }
    }
}

/// On-disk settings layout, shared by the TOML and YAML formats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub log_level: String,
    pub listen_address: String,
    pub listen_port: u16,
    pub fetch: FetchSection,
    pub filter: FilterSection,
    pub usage: UsageSection,
    pub profile: ProfileSection,
    pub subscriptions: Vec<SubscriptionSource>,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            fetch: FetchSection::default(),
            filter: FilterSection::default(),
            usage: UsageSection::default(),
            profile: ProfileSection::default(),
            subscriptions: Vec::new(),
        }
    }
}

impl From<FileSettings> for Settings {
    fn from(file: FileSettings) -> Self {
        let listen_address = if file.listen_address.trim().is_empty() {
            default_listen_address()
        } else {
            file.listen_address
        };
        let exclude_keywords = file
            .filter
            .exclude_keywords
            .unwrap_or_else(default_exclude_keywords);

        Settings {
            log_level: file.log_level,
            listen_address,
            listen_port: file.listen_port,
            user_agent: file.fetch.user_agent,
            fetch_timeout: file.fetch.timeout_secs,
            exclude_keywords,
            total_policy: file.usage.total_policy,
            profile: file.profile.into(),
            subscriptions: file
                .subscriptions
                .into_iter()
                .filter(|s| !s.url.trim().is_empty())
                .collect(),
        }
    }
}

//! Feed body and header parsing
//!
//! Turns raw subscription responses into canonical [`Node`](crate::models::Node)
//! lists and [`UsageInfo`](crate::models::UsageInfo) records.

pub mod explodes;
pub mod infoparser;
pub mod node_manip;
pub mod subparser;

use thiserror::Error;

pub use infoparser::{format_usage_header, parse_usage_header, USERINFO_HEADER};
pub use node_manip::{default_exclude_keywords, filter_nodes, should_ignore};
pub use subparser::{decode_nodes, explode_sub};

/// Failure to decode a feed body or one of its lines
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 error: {0}")]
    Base64(String),

    #[error("Invalid link: {0}")]
    Uri(String),
}

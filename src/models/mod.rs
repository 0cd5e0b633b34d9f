//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the application,
//! separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use nodepin::models::{Node, UsageInfo};
//! use serde_json::Map;
//!
//! let node = Node::new("HK-01", "ss", "hk.example.com", 8388, Map::new());
//! assert!(node.is_usable());
//!
//! let info = UsageInfo::new(10.0, 20.0, 1000.0, 0.0);
//! assert_eq!(info.used(), 30);
//! ```

pub mod app_state;
pub mod node;
pub mod proxy_group_config;
pub mod subscription;

pub use app_state::AppState;
pub use node::Node;
pub use proxy_group_config::{ProxyGroupConfig, ProxyGroupConfigs, ProxyGroupType};
pub use subscription::{FeedResult, SubscriptionSource, TotalPolicy, UsageInfo};

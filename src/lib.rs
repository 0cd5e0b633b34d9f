//! NodePin aggregates proxy subscription feeds.
//!
//! Feeds are fetched concurrently, decoded (Clash YAML or base64 link lists),
//! filtered, and merged into a public usage summary and a single Clash
//! profile.

pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod settings;
pub mod utils;
#[cfg(feature = "web-api")]
pub mod web_handlers;

pub use generator::{to_routing_doc, to_summary, ProfileOptions, RoutingDocument, SummaryEntry};
pub use interfaces::{fetch_all, FeedFetcher, FetchError};
pub use models::{FeedResult, Node, SubscriptionSource, UsageInfo};
pub use settings::Settings;

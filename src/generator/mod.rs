//! Output synthesis
//!
//! Both outputs are pure functions of the fetched feeds: the public
//! dashboard summary and the merged Clash profile.

pub mod config;
pub mod summary;

pub use config::formats::clash::{
    aggregate_usage, clash_proxy, to_routing_doc, ProfileOptions, RoutingDocument,
};
pub use config::remark::{dedup_node_names, format_bytes, format_expire};
pub use summary::{to_summary, SummaryEntry};

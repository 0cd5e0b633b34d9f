pub mod clash;

pub use clash::{
    aggregate_usage, clash_proxy, to_routing_doc, ProfileOptions, RoutingDocument,
};

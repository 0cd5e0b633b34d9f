//! Feed fetching and fan-out
//!
//! [`FeedFetcher`] is the transport seam: production code uses
//! [`HttpFetcher`](crate::utils::http::HttpFetcher), tests plug in canned
//! responses.

pub mod aggregator;

use std::future::Future;

use thiserror::Error;

use crate::parser::DecodeError;

pub use aggregator::{fetch_all, fetch_one, fetch_settled, fetch_urls, FetchOptions};

/// Reasons a single feed is unusable
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid subscription URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("No usable nodes in feed")]
    NoNodes,

    #[error("Other error: {0}")]
    Other(String),
}

/// Raw response of a feed request
#[derive(Debug, Clone, Default)]
pub struct FeedResponse {
    pub body: String,
    /// Value of the `subscription-userinfo` header, if sent
    pub userinfo: Option<String>,
}

pub trait FeedFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FeedResponse, FetchError>>;
}

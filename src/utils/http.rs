use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::interfaces::{FeedFetcher, FeedResponse, FetchError};
use crate::parser::infoparser::USERINFO_HEADER;

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 15;

/// Client identity sent with every feed request. Several feed servers only
/// return the Clash document (and the usage header) to known clients.
pub const DEFAULT_USER_AGENT: &str = "clash.meta";

/// Fetches subscription feeds over HTTP with a shared connection pool
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher sending `user_agent` and giving up after `timeout_secs`
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, FetchError> {
        let user_agent = if user_agent.trim().is_empty() {
            DEFAULT_USER_AGENT
        } else {
            user_agent
        };
        let timeout = if timeout_secs == 0 {
            DEFAULT_TIMEOUT
        } else {
            timeout_secs
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl FeedFetcher for HttpFetcher {
    /// Makes a GET request to `url`, returning the body and the usage header.
    ///
    /// Any non-2xx status is reported as [`FetchError::Status`].
    async fn fetch(&self, url: &str) -> Result<FeedResponse, FetchError> {
        debug!("Fetching subscription: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let userinfo = response
            .headers()
            .get(USERINFO_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(FeedResponse { body, userinfo })
    }
}

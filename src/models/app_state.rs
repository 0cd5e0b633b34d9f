use std::sync::Arc;

use crate::interfaces::aggregator::FetchOptions;
use crate::interfaces::FetchError;
use crate::settings::Settings;
use crate::utils::http::HttpFetcher;

/// Application state structure for the web server
#[derive(Debug)]
pub struct AppState {
    /// Global application settings
    pub config: Arc<Settings>,

    /// Shared HTTP client used for every feed request
    pub fetcher: HttpFetcher,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(config: Arc<Settings>) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&config.user_agent, config.fetch_timeout)?;
        Ok(Self { config, fetcher })
    }

    /// Per-feed processing options derived from the settings
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            exclude_keywords: self.config.exclude_keywords.clone(),
            total_policy: self.config.total_policy,
        }
    }
}

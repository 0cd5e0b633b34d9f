use futures::future::join_all;
use log::{debug, info, warn};

use super::{FeedFetcher, FetchError};
use crate::models::{FeedResult, SubscriptionSource, TotalPolicy};
use crate::parser::{decode_nodes, default_exclude_keywords, filter_nodes, parse_usage_header};
use crate::utils::url::is_valid_url;

/// Per-feed processing options
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Case-insensitive name substrings that mark informational entries
    pub exclude_keywords: Vec<String>,
    pub total_policy: TotalPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            exclude_keywords: default_exclude_keywords(),
            total_policy: TotalPolicy::default(),
        }
    }
}

/// Fetch and process a single feed
///
/// The URL is validated before any request is made. The usage header,
/// body decoding and node filtering all run on this feed's response only.
///
/// # Returns
/// * `Ok(FeedResult)` with at least one usable node
/// * `Err(FetchError::NoNodes)` when nothing survives filtering
pub async fn fetch_one<F: FeedFetcher>(
    fetcher: &F,
    source: &SubscriptionSource,
    options: &FetchOptions,
) -> Result<FeedResult, FetchError> {
    let url = source.url.trim();
    if !is_valid_url(url) {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }

    let response = fetcher.fetch(url).await?;

    let mut info = parse_usage_header(response.userinfo.as_deref());
    info.apply_total_policy(options.total_policy);

    let nodes = decode_nodes(&response.body)?;
    let decoded = nodes.len();
    let nodes = filter_nodes(nodes, &options.exclude_keywords);
    debug!(
        "Feed {} decoded {} nodes, {} kept after filtering",
        url,
        decoded,
        nodes.len()
    );
    if nodes.is_empty() {
        return Err(FetchError::NoNodes);
    }

    Ok(FeedResult {
        url: url.to_string(),
        name: source.name.clone(),
        info,
        nodes,
        error: None,
    })
}

/// Fetch every source concurrently and report one result per source
///
/// Failed feeds are returned with `error` set and no nodes, in the same
/// position as their source.
pub async fn fetch_settled<F: FeedFetcher>(
    fetcher: &F,
    sources: &[SubscriptionSource],
    options: &FetchOptions,
) -> Vec<FeedResult> {
    let tasks = sources
        .iter()
        .map(|source| async move { (source, fetch_one(fetcher, source, options).await) });

    join_all(tasks)
        .await
        .into_iter()
        .map(|(source, outcome)| match outcome {
            Ok(result) => result,
            Err(e) => FeedResult {
                url: source.url.clone(),
                name: source.name.clone(),
                info: Default::default(),
                nodes: Vec::new(),
                error: Some(e.to_string()),
            },
        })
        .collect()
}

/// Fetch every source concurrently, keeping only usable feeds
///
/// A failing feed never affects the others. Feeds that failed or yielded no
/// usable nodes are logged and left out, so the result may be shorter than
/// `sources` but keeps their relative order.
pub async fn fetch_all<F: FeedFetcher>(
    fetcher: &F,
    sources: &[SubscriptionSource],
    options: &FetchOptions,
) -> Vec<FeedResult> {
    let settled = fetch_settled(fetcher, sources, options).await;

    let results: Vec<FeedResult> = settled
        .into_iter()
        .filter_map(|result| match &result.error {
            Some(e) => {
                warn!("Subscription {} skipped: {}", result.url, e);
                None
            }
            None => Some(result),
        })
        .collect();

    info!(
        "Fetched {}/{} subscriptions, {} nodes in total",
        results.len(),
        sources.len(),
        results.iter().map(|r| r.nodes.len()).sum::<usize>()
    );
    results
}

/// Convenience wrapper for bare URLs without display names
pub async fn fetch_urls<F: FeedFetcher>(
    fetcher: &F,
    urls: &[String],
    options: &FetchOptions,
) -> Vec<FeedResult> {
    let sources: Vec<SubscriptionSource> = urls
        .iter()
        .map(|url| SubscriptionSource::new("", url.as_str()))
        .collect();
    fetch_all(fetcher, &sources, options).await
}

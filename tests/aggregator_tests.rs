use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::Poll;

use futures::future::poll_fn;

use nodepin::generator::{to_routing_doc, to_summary, ProfileOptions};
use nodepin::interfaces::{fetch_all, FeedFetcher, FeedResponse, FetchError, FetchOptions};
use nodepin::models::SubscriptionSource;
use nodepin::utils::base64::base64_encode;

/// Serves canned responses; unknown URLs fail like a dropped connection
struct MockFetcher {
    responses: HashMap<String, FeedResponse>,
}

impl MockFetcher {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    fn with(mut self, url: &str, body: &str, userinfo: Option<&str>) -> Self {
        self.responses.insert(
            url.to_string(),
            FeedResponse {
                body: body.to_string(),
                userinfo: userinfo.map(str::to_string),
            },
        );
        self
    }
}

impl FeedFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedResponse, FetchError> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Other(format!("connection reset: {}", url)))
    }
}

/// Tracks how many fetches are pending at once
struct CountingFetcher {
    body: String,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl CountingFetcher {
    fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

/// Returns `Pending` once so the executor moves on to sibling futures
async fn yield_once() {
    let mut yielded = false;
    poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

impl FeedFetcher for CountingFetcher {
    async fn fetch(&self, _url: &str) -> Result<FeedResponse, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        yield_once().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(FeedResponse {
            body: self.body.clone(),
            userinfo: None,
        })
    }
}

const FEED_A: &str = r#"
proxies:
  - name: US-01
    type: ss
    server: us.example.com
    port: 8388
    cipher: aes-128-gcm
    password: pw
  - name: JP-Tokyo
    type: trojan
    server: jp.example.com
    port: 443
    password: pw
"#;

#[cfg(test)]
mod aggregator_tests {
    use super::*;

    #[actix_web::test]
    async fn test_end_to_end_summary() {
        let fetcher = MockFetcher::new().with(
            "https://x/a",
            FEED_A,
            Some("upload=10;download=20;total=1000;expire=0"),
        );
        let sources = vec![
            SubscriptionSource::new("A", "https://x/a"),
            SubscriptionSource::new("B", "https://x/b"),
        ];

        let results = fetch_all(&fetcher, &sources, &FetchOptions::default()).await;
        let summary = to_summary(&results);

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].id, 1);
        assert_eq!(summary[0].name, "A");
        assert_eq!(summary[0].node_count, 2);
        assert_eq!(summary[0].info.total, 1000);
    }

    #[actix_web::test]
    async fn test_fan_out_isolation() {
        let uri_list = [
            "trojan://pw@c1.example.com:443#C-1",
            "vmess://%%%broken",
            "trojan://pw@c2.example.com:443#C-2",
        ]
        .join("\n");
        let fetcher = MockFetcher::new()
            .with("https://x/1", FEED_A, None)
            .with("https://x/3", &base64_encode(&uri_list), None);
        let sources = vec![
            SubscriptionSource::new("one", "https://x/1"),
            SubscriptionSource::new("two", "https://x/2"),
            SubscriptionSource::new("three", "https://x/3"),
        ];

        let results = fetch_all(&fetcher, &sources, &FetchOptions::default()).await;
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["one", "three"]);
        assert_eq!(results[1].nodes.len(), 2);
    }

    #[actix_web::test]
    async fn test_routing_document_from_two_feeds() {
        let fetcher = MockFetcher::new()
            .with(
                "https://x/a",
                FEED_A,
                Some("upload=1; download=2; total=100; expire=4102444800"),
            )
            .with(
                "https://x/b",
                &base64_encode("trojan://pw@us2.example.com:443#US-01"),
                Some("upload=3; download=4; total=200; expire=4000000000"),
            );
        let sources = vec![
            SubscriptionSource::new("A", "https://x/a"),
            SubscriptionSource::new("B", "https://x/b"),
        ];
        let results = fetch_all(&fetcher, &sources, &FetchOptions::default()).await;

        let options = ProfileOptions::default();
        let doc = to_routing_doc(&results, &options, 1_700_000_000);
        let rendered = doc.render();

        // The rendered profile must load back as the same document
        let parsed: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
        let proxies = parsed["proxies"].as_sequence().unwrap();
        let names: Vec<&str> = proxies
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["US-01 (Subscription 1)", "JP-Tokyo", "US-01 (Subscription 2)"]
        );
        assert_eq!(proxies[0]["port"].as_u64(), Some(8388));
        assert!(rendered.contains("name: \"JP-Tokyo\""));

        let groups = parsed["proxy-groups"].as_sequence().unwrap();
        assert_eq!(groups.len(), 6);
        assert_eq!(groups[1]["type"].as_str(), Some("url-test"));
        assert_eq!(groups[1]["interval"].as_u64(), Some(300));

        assert_eq!(doc.usage.upload, 4);
        assert_eq!(doc.usage.download, 6);
        assert_eq!(doc.usage.total, 300);
        assert_eq!(doc.usage.expire, 4_000_000_000);

        let headers = doc.headers(&options);
        assert!(headers.contains(&(
            "Subscription-Userinfo",
            "upload=4; download=6; total=300; expire=4000000000".to_string()
        )));
    }

    #[actix_web::test]
    async fn test_no_sources() {
        let results = fetch_all(&MockFetcher::new(), &[], &FetchOptions::default()).await;
        assert!(results.is_empty());
        assert!(to_summary(&results).is_empty());

        let doc = to_routing_doc(&results, &ProfileOptions::default(), 0);
        let parsed: serde_yaml::Value = serde_yaml::from_str(&doc.render()).unwrap();
        assert_eq!(parsed["rules"][0].as_str(), Some("MATCH,DIRECT"));
        assert!(parsed["proxies"].as_sequence().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_feeds_are_fetched_concurrently() {
        let fetcher = CountingFetcher::new(FEED_A);
        let sources: Vec<SubscriptionSource> = (1..=4)
            .map(|i| SubscriptionSource::new(format!("F{}", i), format!("https://x/{}", i)))
            .collect();

        let results = fetch_all(&fetcher, &sources, &FetchOptions::default()).await;

        assert_eq!(results.len(), 4);
        assert_eq!(fetcher.peak.load(Ordering::SeqCst), 4);
        assert_eq!(fetcher.in_flight.load(Ordering::SeqCst), 0);
    }
}

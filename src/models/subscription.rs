//! Subscription sources, usage accounting and per-feed results

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::node::Node;
use crate::utils::number::{validate_number, MAX_REASONABLE_VALUE};

/// A feed to aggregate, as supplied by the configured source list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SubscriptionSource {
    #[serde(default)]
    pub name: String,
    pub url: String,
}

impl SubscriptionSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// How to treat an upstream `total` that is smaller than the traffic already used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TotalPolicy {
    /// Keep the reported total as is
    AsReported,
    /// Rewrite total to `ceil(used * 1.2)`
    #[default]
    Inflate,
}

impl FromStr for TotalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "as-reported" | "as_reported" | "keep" => Ok(TotalPolicy::AsReported),
            "inflate" => Ok(TotalPolicy::Inflate),
            other => Err(format!("unknown total policy: {}", other)),
        }
    }
}

/// Quota accounting of one feed, in bytes and unix seconds.
///
/// All fields are sanitized on construction; `expire == 0` means unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UsageInfo {
    pub upload: u64,
    pub download: u64,
    pub total: u64,
    pub expire: u64,
}

impl UsageInfo {
    pub fn new(upload: f64, download: f64, total: f64, expire: f64) -> Self {
        UsageInfo {
            upload: validate_number(upload),
            download: validate_number(download),
            total: validate_number(total),
            expire: validate_number(expire),
        }
    }

    /// Traffic consumed so far (upload + download)
    pub fn used(&self) -> u64 {
        self.upload.saturating_add(self.download)
    }

    /// Repair a total that is smaller than the used traffic, according to `policy`.
    pub fn apply_total_policy(&mut self, policy: TotalPolicy) {
        if policy != TotalPolicy::Inflate {
            return;
        }
        let used = self.used() as u128;
        if (self.total as u128) < used {
            // ceil(used * 6 / 5) without going through floats
            let inflated = (used * 6 + 4) / 5;
            self.total = inflated.min(MAX_REASONABLE_VALUE as u128) as u64;
        }
    }
}

/// Outcome of processing one feed during an aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedResult {
    pub url: String,
    pub name: String,
    pub info: UsageInfo,
    pub nodes: Vec<Node>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_info_sanitizes_fields() {
        let info = UsageInfo::new(f64::NAN, -5.0, f64::INFINITY, 1_700_000_000.0);
        assert_eq!(info.upload, 0);
        assert_eq!(info.download, 0);
        assert_eq!(info.total, MAX_REASONABLE_VALUE);
        assert_eq!(info.expire, 1_700_000_000);
    }

    #[test]
    fn test_inflate_total_when_smaller_than_used() {
        let mut info = UsageInfo::new(10.0, 20.0, 5.0, 0.0);
        info.apply_total_policy(TotalPolicy::Inflate);
        assert_eq!(info.total, 36);

        let mut info = UsageInfo::new(1.0, 0.0, 0.0, 0.0);
        info.apply_total_policy(TotalPolicy::Inflate);
        assert_eq!(info.total, 2);
    }

    #[test]
    fn test_total_kept_when_sufficient_or_as_reported() {
        let mut info = UsageInfo::new(10.0, 20.0, 1000.0, 0.0);
        info.apply_total_policy(TotalPolicy::Inflate);
        assert_eq!(info.total, 1000);

        let mut info = UsageInfo::new(10.0, 20.0, 5.0, 0.0);
        info.apply_total_policy(TotalPolicy::AsReported);
        assert_eq!(info.total, 5);
    }

    #[test]
    fn test_inflated_total_is_clamped() {
        let max = MAX_REASONABLE_VALUE as f64;
        let mut info = UsageInfo::new(max, max, 0.0, 0.0);
        info.apply_total_policy(TotalPolicy::Inflate);
        assert_eq!(info.total, MAX_REASONABLE_VALUE);
    }

    #[test]
    fn test_total_policy_from_str() {
        assert_eq!("Inflate".parse::<TotalPolicy>(), Ok(TotalPolicy::Inflate));
        assert_eq!(
            " as-reported ".parse::<TotalPolicy>(),
            Ok(TotalPolicy::AsReported)
        );
        assert!("bogus".parse::<TotalPolicy>().is_err());
    }
}

//! Usage metadata carried by the `subscription-userinfo` response header

use crate::models::UsageInfo;
use crate::utils::number::parse_number;

/// Name of the response header carrying `upload=..; download=..; total=..; expire=..`
pub const USERINFO_HEADER: &str = "subscription-userinfo";

/// Parse a `subscription-userinfo` header value into sanitized usage data.
///
/// Pairs are separated by `;`, keys and values are trimmed, unknown keys and
/// pairs without `=` are ignored, missing keys stay `0`. A missing header
/// yields an all-zero record.
///
/// # Examples
/// ```
/// use nodepin::parser::infoparser::parse_usage_header;
///
/// let info = parse_usage_header(Some("upload=100; download=200; total=1000; expire=1700000000"));
/// assert_eq!(info.used(), 300);
/// assert_eq!(info.expire, 1700000000);
/// ```
pub fn parse_usage_header(header: Option<&str>) -> UsageInfo {
    let mut upload = 0.0;
    let mut download = 0.0;
    let mut total = 0.0;
    let mut expire = 0.0;

    if let Some(userinfo) = header {
        for info_item in userinfo.split(';') {
            let Some((key, value)) = info_item.split_once('=') else {
                continue;
            };
            let value = parse_number(value);
            match key.trim() {
                "upload" => upload = value,
                "download" => download = value,
                "total" => total = value,
                "expire" => expire = value,
                _ => {}
            }
        }
    }

    UsageInfo::new(upload, download, total, expire)
}

/// Render usage data back into the header convention, so generated profiles
/// can themselves be consumed as a subscription feed.
pub fn format_usage_header(info: &UsageInfo) -> String {
    format!(
        "upload={}; download={}; total={}; expire={}",
        info.upload, info.download, info.total, info.expire
    )
}

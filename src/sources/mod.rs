// src/sources/mod.rs
//! Source fetchers: given a query string, return candidate `RawItem`s or a
//! `SourceError`. The runner treats any failure as "zero items for this
//! query" — errors are isolated per query, never fatal.

pub mod bing_news;
pub mod google_news;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

use crate::types::RawItem;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Network failure, timeout, or non-2xx response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Fetched content failed to parse as RSS.
    #[error("malformed feed: {0}")]
    MalformedFeed(#[from] quick_xml::DeError),
}

#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<Vec<RawItem>, SourceError>;
    fn name(&self) -> &'static str;
}

/* ----------------------------
RSS 2.0 wire shapes (shared by both fetchers)
---------------------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct Rss {
    pub channel: Channel,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Channel {
    #[serde(rename = "item", default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Item {
    pub title: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    pub description: Option<String>,
    pub source: Option<ItemSource>,
}

/// Google News emits `<source url="...">Publisher</source>` per item.
#[derive(Debug, Deserialize)]
pub(crate) struct ItemSource {
    #[serde(rename = "@url")]
    pub url: Option<String>,
    #[serde(rename = "$text")]
    pub name: Option<String>,
}

pub(crate) fn parse_rss(xml: &str) -> Result<Vec<Item>, SourceError> {
    let cleaned = scrub_html_entities_for_xml(xml);
    let rss: Rss = quick_xml::de::from_str(&cleaned)?;
    Ok(rss.channel.items)
}

/// Best-effort publication-date parse; RFC 2822 first (standard RSS), then
/// RFC 3339. Unparsable dates yield `None` and the item stays eligible.
pub(crate) fn parse_pub_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.date_naive())
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

/// Truncate to a character budget without splitting a word mid-way where
/// possible.
pub(crate) fn truncate_summary(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(pos) if pos > max_chars / 2 => format!("{}...", &cut[..pos]),
        _ => format!("{}...", cut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pub_date_rfc2822_and_fallback() {
        assert_eq!(
            parse_pub_date("Tue, 14 May 2024 08:00:00 GMT"),
            NaiveDate::from_ymd_opt(2024, 5, 14)
        );
        assert_eq!(
            parse_pub_date("2024-05-14T08:00:00Z"),
            NaiveDate::from_ymd_opt(2024, 5, 14)
        );
        assert_eq!(parse_pub_date("next Tuesday"), None);
    }

    #[test]
    fn summary_truncation_prefers_word_boundary() {
        let s = "a very long summary that keeps going well past the budget";
        let t = truncate_summary(s, 30);
        assert!(t.len() <= 34);
        assert!(t.ends_with("..."));
    }
}

// src/sources/google_news.rs
//! Google News RSS search. Google titles carry the publisher as a
//! ` - Source` suffix and each item has a `<source>` element; both are used
//! to fill `source` / `source_url`.

use async_trait::async_trait;
use tracing::debug;

use crate::signals::normalize_text;
use crate::sources::{parse_pub_date, parse_rss, truncate_summary, SourceError, SourceFetcher};
use crate::types::RawItem;

const BASE_URL: &str = "https://news.google.com/rss/search";
const SUMMARY_MAX_CHARS: usize = 300;

pub struct GoogleNewsFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleNewsFetcher {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL.to_string())
    }

    /// Base URL override, used by tests against a local server.
    pub fn with_base_url(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent(concat!("pride-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, base_url }
    }

    /// Parse a Google News RSS document into raw items. Public so tests can
    /// feed fixture XML without a network round trip.
    pub fn parse_items(xml: &str) -> Result<Vec<RawItem>, SourceError> {
        let items = parse_rss(xml)?;
        let mut out = Vec::with_capacity(items.len());
        for it in items {
            let url = match it.link {
                Some(l) if !l.trim().is_empty() => l.trim().to_string(),
                _ => continue,
            };
            let raw_title = it.title.unwrap_or_default();
            let (title, title_source) = split_source_suffix(&raw_title);
            if title.is_empty() {
                continue;
            }

            let (source, source_url) = match &it.source {
                Some(s) => (
                    s.name.clone().filter(|n| !n.is_empty()).unwrap_or(title_source),
                    s.url.clone().unwrap_or_default(),
                ),
                None => (title_source, String::new()),
            };

            out.push(RawItem {
                title,
                url,
                published: it.pub_date.as_deref().and_then(parse_pub_date),
                source,
                source_url,
                summary: truncate_summary(
                    &normalize_text(it.description.as_deref().unwrap_or_default()),
                    SUMMARY_MAX_CHARS,
                ),
            });
        }
        Ok(out)
    }
}

impl Default for GoogleNewsFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFetcher for GoogleNewsFetcher {
    async fn fetch(&self, query: &str) -> Result<Vec<RawItem>, SourceError> {
        let url = format!(
            "{}?q={}&hl=en-GB&gl=GB&ceid=GB:en",
            self.base_url,
            urlencoding::encode(query)
        );
        debug!(%url, "google news request");
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Self::parse_items(&body)
    }

    fn name(&self) -> &'static str {
        "Google News"
    }
}

/// Split the `Article Title - Source Name` convention. Falls back to the
/// full title with an empty source when no suffix is present.
fn split_source_suffix(title: &str) -> (String, String) {
    match title.rfind(" - ") {
        Some(pos) => (
            title[..pos].trim().to_string(),
            title[pos + 3..].trim().to_string(),
        ),
        None => (title.trim().to_string(), String::new()),
    }
}

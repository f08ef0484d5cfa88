// src/sources/bing_news.rs
//! Bing News RSS search, the secondary source. Bing items carry no
//! per-item source element, so the publisher falls back to the feed name.

use async_trait::async_trait;
use tracing::debug;

use crate::signals::normalize_text;
use crate::sources::{parse_pub_date, parse_rss, truncate_summary, SourceError, SourceFetcher};
use crate::types::RawItem;

const BASE_URL: &str = "https://www.bing.com/news/search";
const SUMMARY_MAX_CHARS: usize = 300;

pub struct BingNewsFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl BingNewsFetcher {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent(concat!("pride-tracker/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, base_url }
    }

    pub fn parse_items(xml: &str) -> Result<Vec<RawItem>, SourceError> {
        let items = parse_rss(xml)?;
        let mut out = Vec::with_capacity(items.len());
        for it in items {
            let url = match it.link {
                Some(l) if !l.trim().is_empty() => l.trim().to_string(),
                _ => continue,
            };
            let title = normalize_text(it.title.as_deref().unwrap_or_default());
            if title.is_empty() {
                continue;
            }
            out.push(RawItem {
                title,
                url,
                published: it.pub_date.as_deref().and_then(parse_pub_date),
                source: "Bing News".to_string(),
                source_url: "https://www.bing.com/news".to_string(),
                summary: truncate_summary(
                    &normalize_text(it.description.as_deref().unwrap_or_default()),
                    SUMMARY_MAX_CHARS,
                ),
            });
        }
        Ok(out)
    }
}

impl Default for BingNewsFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFetcher for BingNewsFetcher {
    async fn fetch(&self, query: &str) -> Result<Vec<RawItem>, SourceError> {
        let url = format!(
            "{}?q={}&format=rss",
            self.base_url,
            urlencoding::encode(query)
        );
        debug!(%url, "bing news request");
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
        "Bing News"
    }
}

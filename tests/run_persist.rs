// tests/run_persist.rs
use async_trait::async_trait;
use chrono::{Duration, Utc};

use pride_tracker::config::TrackerConfig;
use pride_tracker::pipeline::Pipeline;
use pride_tracker::sources::{SourceError, SourceFetcher};
use pride_tracker::types::RawItem;

struct FixedFetcher(Vec<RawItem>);

#[async_trait]
impl SourceFetcher for FixedFetcher {
    async fn fetch(&self, _query: &str) -> Result<Vec<RawItem>, SourceError> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &'static str {
        "Fixed"
    }
}

fn raw(url: &str, title: &str, days_ago: i64) -> RawItem {
    RawItem {
        title: title.to_string(),
        url: url.to_string(),
        published: Some(Utc::now().date_naive() - Duration::days(days_ago)),
        source: "Kent Online".to_string(),
        source_url: "https://www.kentonline.co.uk".to_string(),
        summary: "summary text".to_string(),
    }
}

fn cfg_in(dir: &std::path::Path) -> TrackerConfig {
    let mut cfg = TrackerConfig::default();
    cfg.limits.max_queries_per_run = 1;
    cfg.paths.state = dir.join("seen_urls.json");
    cfg.paths.feed = dir.join("pinknews.json");
    cfg
}

#[tokio::test]
async fn run_writes_feed_and_state_with_viewer_schema() {
    let tmp = tempfile::tempdir().unwrap();
    let items = vec![
        raw("https://n.test/court", "Man sentenced over homophobic attack in Sheerness", 4),
        raw("https://n.test/pride", "Faversham Pride announces headline act", 2),
    ];
    let pipeline = Pipeline::new(cfg_in(tmp.path()), vec![Box::new(FixedFetcher(items))]).unwrap();

    let report = pipeline.run_once().await.unwrap();
    assert_eq!(report.kept, 2);
    assert_eq!(report.feed_len, 2);

    let feed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.path().join("pinknews.json")).unwrap())
            .unwrap();
    let arr = feed.as_array().unwrap();
    assert_eq!(arr.len(), 2);

    // Newest published first.
    assert_eq!(arr[0]["url"], "https://n.test/pride");
    assert_eq!(arr[0]["label"], "Pride");
    assert_eq!(arr[0]["area"], "Faversham");
    assert_eq!(arr[1]["label"], "Hate crime");
    for entry in arr {
        assert!(entry["title"].is_string());
        assert!(entry["published"].is_string());
        assert!(entry["source"].is_string());
        assert!(entry["found_at"].is_string());
    }

    let state: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.path().join("seen_urls.json")).unwrap())
            .unwrap();
    assert_eq!(state["seen_urls"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn repeated_run_keeps_feed_stable() {
    let tmp = tempfile::tempdir().unwrap();
    let items = vec![raw("https://n.test/one", "Minster lgbtq coffee morning", 1)];
    let pipeline = Pipeline::new(cfg_in(tmp.path()), vec![Box::new(FixedFetcher(items))]).unwrap();

    let first = pipeline.run_once().await.unwrap();
    assert_eq!(first.kept, 1);
    let feed_after_first = std::fs::read_to_string(tmp.path().join("pinknews.json")).unwrap();

    // Unchanged upstream: second run admits nothing, feed content survives
    // because new runs merge into the existing feed.
    let second = pipeline.run_once().await.unwrap();
    assert_eq!(second.kept, 0);
    assert_eq!(second.feed_len, 1);
    let feed_after_second = std::fs::read_to_string(tmp.path().join("pinknews.json")).unwrap();
    assert_eq!(feed_after_first, feed_after_second);
}

#[tokio::test]
async fn zero_time_budget_still_writes_state_and_feed() {
    let tmp = tempfile::tempdir().unwrap();
    let items = vec![raw("https://n.test/never", "Sheppey lgbtq story", 1)];
    let mut cfg = cfg_in(tmp.path());
    cfg.limits.time_budget_secs = 0;
    let pipeline = Pipeline::new(cfg, vec![Box::new(FixedFetcher(items))]).unwrap();

    let report = pipeline.run_once().await.unwrap();
    assert_eq!(report.queries_issued, 0);
    assert_eq!(report.kept, 0);
    assert_eq!(report.feed_len, 0);

    // Partial progress (here: none) is still persisted.
    let feed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.path().join("pinknews.json")).unwrap())
            .unwrap();
    assert_eq!(feed.as_array().unwrap().len(), 0);
    assert!(tmp.path().join("seen_urls.json").exists());
}

#[tokio::test]
async fn feed_truncates_to_cap() {
    let tmp = tempfile::tempdir().unwrap();
    let items: Vec<RawItem> = (0..6)
        .map(|i| raw(&format!("https://n.test/{i}"), "Swale lgbtq news roundup", i))
        .collect();
    let mut cfg = cfg_in(tmp.path());
    cfg.limits.max_feed_items = 3;
    let pipeline = Pipeline::new(cfg, vec![Box::new(FixedFetcher(items))]).unwrap();

    let report = pipeline.run_once().await.unwrap();
    assert_eq!(report.kept, 6);
    assert_eq!(report.feed_len, 3);
}

// src/pipeline.rs
//! Run orchestration: plan queries, fetch and gate candidates, then
//! dedup/sort/truncate and persist. A single query's fetch or parse failure
//! is logged and isolated; persistence failures are fatal because the run's
//! whole purpose is producing the feed.

use std::cmp::Reverse;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::config::TrackerConfig;
use crate::location::LocationResolver;
use crate::queries::build_queries;
use crate::signals::{normalize_text, TextSignals};
use crate::sources::SourceFetcher;
use crate::state::SeenState;
use crate::types::{EnrichedItem, RawItem};

/// Missing/unparseable dates sort below any real date.
const EPOCH_SENTINEL: NaiveDate = NaiveDate::MIN;

/* ----------------------------
Per-item filter stages
---------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Scope,
    Topic,
    Recency,
}

impl StageKind {
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Scope => "scope",
            StageKind::Topic => "topic",
            StageKind::Recency => "recency",
        }
    }
}

pub struct StageInput<'a> {
    pub item: &'a RawItem,
    pub blob: &'a str,
}

pub struct FilterStage<'a> {
    pub kind: StageKind,
    check: Box<dyn Fn(&StageInput<'_>) -> bool + Send + Sync + 'a>,
}

/// The ordered filter pipeline, one predicate per stage. Order carries the
/// precedence: scope gates before topic, topic before recency.
pub fn filter_stages<'a>(
    resolver: &'a LocationResolver,
    signals: &'a TextSignals,
    cutoff: NaiveDate,
) -> Vec<FilterStage<'a>> {
    vec![
        FilterStage {
            kind: StageKind::Scope,
            check: Box::new(move |input| resolver.looks_in_scope(input.blob)),
        },
        FilterStage {
            kind: StageKind::Topic,
            check: Box::new(move |input| signals.has_topic_signal(input.blob)),
        },
        FilterStage {
            kind: StageKind::Recency,
            // Items without a parsable date are kept; recency filtering is
            // best-effort, not authoritative.
            check: Box::new(move |input| input.item.published.is_none_or(|d| d >= cutoff)),
        },
    ]
}

/// First stage that rejects the input, or `None` when all pass.
pub fn first_rejection(stages: &[FilterStage<'_>], input: &StageInput<'_>) -> Option<StageKind> {
    stages
        .iter()
        .find(|s| !(s.check)(input))
        .map(|s| s.kind)
}

/* ----------------------------
Run accounting
---------------------------- */

#[derive(Debug, Default, Clone, Copy)]
pub struct RunReport {
    pub queries_planned: usize,
    pub queries_issued: usize,
    pub raw_items: usize,
    pub kept: usize,
    pub skipped_no_url: usize,
    pub skipped_seen: usize,
    pub skipped_scope: usize,
    pub skipped_topic: usize,
    pub skipped_stale: usize,
    pub source_errors: usize,
    pub feed_len: usize,
}

/* ----------------------------
Pipeline
---------------------------- */

pub struct Pipeline {
    cfg: TrackerConfig,
    resolver: LocationResolver,
    signals: TextSignals,
    fetchers: Vec<Box<dyn SourceFetcher>>,
}

impl Pipeline {
    pub fn new(cfg: TrackerConfig, fetchers: Vec<Box<dyn SourceFetcher>>) -> Result<Self> {
        let resolver = LocationResolver::compile(&cfg)?;
        let signals = TextSignals::from_config(&cfg);
        Ok(Self {
            cfg,
            resolver,
            signals,
            fetchers,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.cfg
    }

    /// One full run: load state and the previous feed, collect, finalize,
    /// persist state + feed. New items merge into the existing feed; an
    /// already-seen URL is never re-admitted, so with an unchanged upstream
    /// the feed content stays stable run over run.
    pub async fn run_once(&self) -> Result<RunReport> {
        let mut state = SeenState::load(&self.cfg.paths.state)?;
        let previous = load_feed(&self.cfg.paths.feed)?;
        let (accumulated, mut report) = self.collect(&mut state).await;

        let mut merged = previous;
        merged.extend(accumulated);
        let feed = finalize_feed(merged, self.cfg.limits.max_feed_items);
        report.feed_len = feed.len();

        write_feed(&self.cfg.paths.feed, &feed)?;
        state.save(&self.cfg.paths.state, self.cfg.limits.max_seen_urls)?;

        info!(
            queries_planned = report.queries_planned,
            queries_issued = report.queries_issued,
            raw_items = report.raw_items,
            kept = report.kept,
            skipped_seen = report.skipped_seen,
            skipped_scope = report.skipped_scope,
            skipped_topic = report.skipped_topic,
            skipped_stale = report.skipped_stale,
            source_errors = report.source_errors,
            feed_len = report.feed_len,
            "run complete"
        );
        Ok(report)
    }

    /// The query loop. Both run limits are checked before issuing the next
    /// query; breaching either halts the loop and keeps partial progress.
    /// URLs are marked seen the moment an item is accepted, so a later
    /// query in the same run cannot re-admit them.
    pub async fn collect(&self, state: &mut SeenState) -> (Vec<EnrichedItem>, RunReport) {
        let mut report = RunReport::default();
        let mut accumulated: Vec<EnrichedItem> = Vec::new();

        let cutoff = Utc::now().date_naive() - chrono::Duration::days(self.cfg.limits.lookback_days);
        let stages = filter_stages(&self.resolver, &self.signals, cutoff);

        let queries = build_queries(&self.cfg);
        report.queries_planned = queries.len();

        let started = Instant::now();
        let budget = Duration::from_secs(self.cfg.limits.time_budget_secs);

        for query in &queries {
            if report.queries_issued >= self.cfg.limits.max_queries_per_run {
                info!(issued = report.queries_issued, "query cap reached, stopping");
                break;
            }
            if started.elapsed() >= budget {
                info!(
                    elapsed_secs = started.elapsed().as_secs(),
                    "time budget exhausted, stopping"
                );
                break;
            }
            report.queries_issued += 1;

            for fetcher in &self.fetchers {
                let mut items = match fetcher.fetch(query).await {
                    Ok(items) => items,
                    Err(e) => {
                        warn!(source = fetcher.name(), %query, error = %e, "source error");
                        report.source_errors += 1;
                        continue;
                    }
                };
                items.truncate(self.cfg.limits.max_items_per_query);
                report.raw_items += items.len();

                for item in items {
                    self.admit(item, &stages, state, &mut accumulated, &mut report);
                }
            }
        }

        (accumulated, report)
    }

    fn admit(
        &self,
        item: RawItem,
        stages: &[FilterStage<'_>],
        state: &mut SeenState,
        accumulated: &mut Vec<EnrichedItem>,
        report: &mut RunReport,
    ) {
        if item.url.trim().is_empty() {
            report.skipped_no_url += 1;
            return;
        }
        if state.contains(&item.url) {
            report.skipped_seen += 1;
            return;
        }

        let blob = normalize_text(&format!(
            "{} {} {} {}",
            item.title, item.summary, item.source, item.url
        ));
        let input = StageInput {
            item: &item,
            blob: &blob,
        };
        if let Some(kind) = first_rejection(stages, &input) {
            debug!(stage = kind.name(), url = %item.url, "item rejected");
            match kind {
                StageKind::Scope => report.skipped_scope += 1,
                StageKind::Topic => report.skipped_topic += 1,
                StageKind::Recency => report.skipped_stale += 1,
            }
            return;
        }

        let area = self
            .resolver
            .find_area(&blob)
            .unwrap_or_default()
            .to_string();
        let label = classify(&self.signals, &blob);
        let url = item.url.clone();
        accumulated.push(EnrichedItem::from_raw(item, area, label, Utc::now()));
        state.insert(&url);
        report.kept += 1;
    }
}

/* ----------------------------
Finalization
---------------------------- */

/// Dedup by URL (later occurrence overwrites the earlier within one run),
/// sort by published date descending with missing dates last, truncate.
/// The sort is stable, so the order is deterministic within a run.
pub fn finalize_feed(items: Vec<EnrichedItem>, max_items: usize) -> Vec<EnrichedItem> {
    let mut by_url: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut deduped: Vec<EnrichedItem> = Vec::with_capacity(items.len());
    for item in items {
        match by_url.get(&item.url) {
            Some(&idx) => deduped[idx] = item,
            None => {
                by_url.insert(item.url.clone(), deduped.len());
                deduped.push(item);
            }
        }
    }

    deduped.sort_by_key(|it| Reverse(it.published.unwrap_or(EPOCH_SENTINEL)));
    deduped.truncate(max_items);
    deduped
}

/// Previous run's feed; a missing file is an empty feed, anything else
/// unreadable is fatal.
pub fn load_feed(path: &Path) -> Result<Vec<EnrichedItem>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading feed from {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing feed at {}", path.display()))
}

pub fn write_feed(path: &Path, feed: &[EnrichedItem]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating feed dir {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(feed).context("serializing feed")?;
    std::fs::write(path, json).with_context(|| format!("writing feed to {}", path.display()))?;
    Ok(())
}

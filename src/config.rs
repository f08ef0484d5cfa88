// src/config.rs
//! Run configuration: term lists, area lists, and numeric limits. Loaded once
//! at process start and never mutated afterwards. Resolution order:
//! `TRACKER_CONFIG_PATH` env var, then `config/tracker.toml`, then the
//! built-in defaults. Changing any tunable affects throughput/coverage only,
//! never correctness.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/tracker.toml";
pub const ENV_CONFIG_PATH: &str = "TRACKER_CONFIG_PATH";

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Upper bound on queries actually issued in one run.
    pub max_queries_per_run: usize,
    /// Wall-clock budget for the query loop, in seconds.
    pub time_budget_secs: u64,
    /// Cap on raw items taken from a single query response.
    pub max_items_per_query: usize,
    /// Cap on the written output feed.
    pub max_feed_items: usize,
    /// Maximum age of a published item still eligible for inclusion.
    pub lookback_days: i64,
    /// Cap on the persisted seen-URL set; oldest entries drop first.
    pub max_seen_urls: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_queries_per_run: 25,
            time_budget_secs: 120,
            max_items_per_query: 20,
            max_feed_items: 200,
            lookback_days: 365,
            max_seen_urls: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub state: PathBuf,
    pub feed: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            state: PathBuf::from("data/seen_urls.json"),
            feed: PathBuf::from("data/pinknews.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub limits: Limits,
    pub paths: Paths,
    /// Sub-areas in priority order. "Isle of Sheppey" is listed before the
    /// bare "Sheppey" so the qualified compound resolves first.
    pub areas: Vec<String>,
    /// Broader region/institution names that keep an item in scope when no
    /// specific area name matches.
    pub allow_patterns: Vec<String>,
    /// False-positive locations that share a word with the region. Checked
    /// first and they short-circuit scope to false.
    pub block_patterns: Vec<String>,
    /// Locations excluded from issued queries via a `-"..."` clause.
    pub negative_query_terms: Vec<String>,
    pub topic_terms: Vec<String>,
    pub court_terms: Vec<String>,
    pub hate_terms: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            paths: Paths::default(),
            areas: vec_of(&[
                "Isle of Sheppey",
                "Sheppey",
                "Sheerness",
                "Queenborough",
                "Minster",
                "Eastchurch",
                "Leysdown",
                "Sittingbourne",
                "Faversham",
                "Swale",
                "Medway",
            ]),
            allow_patterns: vec_of(&[
                "Kent",
                "Kent Police",
                "Kent County Council",
                "Swale Borough Council",
                "Medway Council",
            ]),
            block_patterns: vec_of(&[
                "Kent State",
                "Kent, Ohio",
                "Kent Ohio",
                "Kent, Washington",
                "Kent Washington",
                "Kent County, Michigan",
                "Kent County, Delaware",
                "New Kent",
            ]),
            negative_query_terms: vec_of(&[
                "Kent State",
                "Kent Ohio",
                "Kent Washington",
                "New Kent",
            ]),
            // Matching is substring; phrase forms ("trans rights",
            // "drag queen") avoid firing inside "transport" or "drag racing".
            topic_terms: vec_of(&[
                "lgbt",
                "lgbtq",
                "gay",
                "lesbian",
                "bisexual",
                "transgender",
                "trans rights",
                "queer",
                "pride",
                "drag queen",
                "non-binary",
                "same-sex",
                "homophobic",
                "homophobia",
                "transphobic",
                "transphobia",
                "gender identity",
                "conversion therapy",
                "section 28",
            ]),
            court_terms: vec_of(&[
                "court",
                "trial",
                "sentenced",
                "sentencing",
                "jailed",
                "convicted",
                "guilty",
                "magistrates",
                "crown court",
                "prosecution",
                "tribunal",
                "inquest",
                "charged",
                "remanded",
            ]),
            hate_terms: vec_of(&[
                "hate crime",
                "hate-crime",
                "hate incident",
                "homophobic attack",
                "transphobic attack",
                "homophobic abuse",
                "transphobic abuse",
                "slur",
            ]),
        }
    }
}

fn vec_of(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl TrackerConfig {
    /// Parse from a TOML string; omitted sections fall back to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing tracker config TOML")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading tracker config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Load using env var + fallbacks:
    /// 1) $TRACKER_CONFIG_PATH (must exist if set)
    /// 2) config/tracker.toml
    /// 3) built-in defaults
    pub fn load() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            return Self::from_path(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::from_path(&default_p);
        }
        Ok(Self::default())
    }
}

// src/signals.rs
//! Text signal primitives: normalization of raw feed text and pure
//! case-insensitive term matching against the configured term lists.

use crate::config::TrackerConfig;

/// Normalize text: decode HTML entities, strip tags, collapse whitespace,
/// cap length.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Pure, total term matchers over lowercased text. The term lists are
/// configuration constants, lowercased once at construction.
#[derive(Debug, Clone)]
pub struct TextSignals {
    topic_terms: Vec<String>,
    court_terms: Vec<String>,
    hate_terms: Vec<String>,
}

impl TextSignals {
    pub fn from_config(cfg: &TrackerConfig) -> Self {
        Self {
            topic_terms: lowercased(&cfg.topic_terms),
            court_terms: lowercased(&cfg.court_terms),
            hate_terms: lowercased(&cfg.hate_terms),
        }
    }

    pub fn has_topic_signal(&self, text: &str) -> bool {
        contains_any(text, &self.topic_terms)
    }

    pub fn has_court_signal(&self, text: &str) -> bool {
        contains_any(text, &self.court_terms)
    }

    pub fn has_hate_signal(&self, text: &str) -> bool {
        contains_any(text, &self.hate_terms)
    }
}

fn lowercased(terms: &[String]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

fn contains_any(text: &str, terms: &[String]) -> bool {
    let lower = text.to_lowercase();
    terms.iter().any(|t| lower.contains(t.as_str()))
}

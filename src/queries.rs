// src/queries.rs
//! Search query planning. Builds the bounded, deduplicated set of query
//! strings for one run: a few broad region-wide queries first, then one
//! query per (area x term-group) combination, each carrying a fixed
//! negative clause that excludes known false-positive locations. How many
//! of these actually get issued is decided by the runner's caps, not here.

use std::collections::HashSet;

use crate::config::TrackerConfig;

// Term-group sizes; larger groups make Google/Bing drop the tail operators.
const TOPIC_GROUP_LEN: usize = 6;
const HATE_GROUP_LEN: usize = 3;

/// Quote multi-word terms so the search engine treats them as phrases.
fn quoted(term: &str) -> String {
    if term.contains(' ') {
        format!("\"{}\"", term)
    } else {
        term.to_string()
    }
}

fn or_group<'a>(terms: impl Iterator<Item = &'a String>) -> String {
    let parts: Vec<String> = terms.map(|t| quoted(t)).collect();
    format!("({})", parts.join(" OR "))
}

fn negative_clause(terms: &[String]) -> String {
    terms
        .iter()
        .map(|t| format!("-\"{}\"", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered, deduplicated query strings for this run. Insertion order is
/// preserved; no query string repeats.
pub fn build_queries(cfg: &TrackerConfig) -> Vec<String> {
    let neg = negative_clause(&cfg.negative_query_terms);
    let topic_group = or_group(cfg.topic_terms.iter().take(TOPIC_GROUP_LEN));
    let hate_group = or_group(cfg.hate_terms.iter().take(HATE_GROUP_LEN));
    let region = cfg
        .allow_patterns
        .first()
        .map(String::as_str)
        .unwrap_or("Kent");

    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();
    let mut push = |q: String| {
        let q = if neg.is_empty() { q } else { format!("{} {}", q, neg) };
        if seen.insert(q.clone()) {
            out.push(q);
        }
    };

    // Broad combined-topic queries first; they survive the run cap even on
    // the tightest budgets.
    push(format!("{} {}", region, topic_group));
    push(format!("{} {}", region, hate_group));
    push(format!("{} pride", region));

    // One query per area per term group.
    for area in &cfg.areas {
        push(format!("{} {}", quoted(area), topic_group));
        push(format!("{} {}", quoted(area), hate_group));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_are_unique_and_insertion_ordered() {
        let mut cfg = TrackerConfig::default();
        cfg.areas.push("Sheerness".to_string()); // duplicate on purpose
        let queries = build_queries(&cfg);
        let mut seen = HashSet::new();
        for q in &queries {
            assert!(seen.insert(q.clone()), "duplicate query: {}", q);
        }
        // Broad queries come before any per-area query.
        assert!(queries[0].starts_with("Kent "));
    }

    #[test]
    fn every_query_carries_the_negative_clause() {
        let cfg = TrackerConfig::default();
        for q in build_queries(&cfg) {
            assert!(q.contains("-\"Kent State\""), "missing negative clause: {}", q);
        }
    }

    #[test]
    fn area_count_drives_query_count() {
        let cfg = TrackerConfig::default();
        let queries = build_queries(&cfg);
        // 3 broad + 2 per area.
        assert_eq!(queries.len(), 3 + 2 * cfg.areas.len());
    }

    #[test]
    fn multiword_terms_are_phrase_quoted() {
        let cfg = TrackerConfig::default();
        let queries = build_queries(&cfg);
        assert!(queries.iter().any(|q| q.contains("\"Isle of Sheppey\"")));
        assert!(queries.iter().any(|q| q.contains("\"hate crime\"")));
    }
}

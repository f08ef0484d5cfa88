// src/location.rs
//! Geographic relevance gate. This is a recall-oriented heuristic over raw
//! text, not geocoding: block patterns catch known proper-noun collisions
//! (places elsewhere that share a word with the region) and are checked
//! first, because a block term and an area term can co-occur in ambiguous
//! text.

use anyhow::{anyhow, Result};
use regex::Regex;

use crate::config::TrackerConfig;

#[derive(Debug)]
struct AreaPattern {
    name: String,
    re: Regex,
}

/// Compiled allow/block/area patterns, built once from configuration.
#[derive(Debug)]
pub struct LocationResolver {
    areas: Vec<AreaPattern>,
    allow: Vec<Regex>,
    block: Vec<Regex>,
}

fn word_pattern(term: &str) -> Result<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term)))
        .map_err(|e| anyhow!("location pattern `{}` regex error: {}", term, e))
}

impl LocationResolver {
    pub fn compile(cfg: &TrackerConfig) -> Result<Self> {
        let areas = cfg
            .areas
            .iter()
            .map(|name| {
                Ok(AreaPattern {
                    name: name.clone(),
                    re: word_pattern(name)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let allow = cfg
            .allow_patterns
            .iter()
            .map(|p| word_pattern(p))
            .collect::<Result<Vec<_>>>()?;
        let block = cfg
            .block_patterns
            .iter()
            .map(|p| word_pattern(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { areas, allow, block })
    }

    /// Resolve the sub-area an item belongs to. Area names are tested as
    /// whole words, case-insensitively, in configured priority order; the
    /// qualified compound name ("Isle of Sheppey") is ordered before the
    /// bare name ("Sheppey"), so text carrying the qualifying prefix phrase
    /// resolves to the qualified variant and bare mentions resolve to the
    /// bare one.
    pub fn find_area(&self, text: &str) -> Option<&str> {
        self.areas
            .iter()
            .find(|a| a.re.is_match(text))
            .map(|a| a.name.as_str())
    }

    /// Block patterns win unconditionally, even over an explicit area match.
    pub fn looks_in_scope(&self, text: &str) -> bool {
        if self.block.iter().any(|re| re.is_match(text)) {
            return false;
        }
        if self.find_area(text).is_some() {
            return true;
        }
        self.allow.iter().any(|re| re.is_match(text))
    }
}

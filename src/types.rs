// src/types.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Label;

/// One candidate article as produced by a source fetcher, before any
/// relevance gating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub title: String,
    pub url: String,
    /// Calendar date of publication; `None` when the feed omitted it or the
    /// date string did not parse (such items are kept, not dropped).
    pub published: Option<NaiveDate>,
    pub source: String,
    pub source_url: String,
    pub summary: String,
}

/// An accepted item, enriched at the moment it passed all filters.
/// Serializes straight into the viewer feed schema; the viewer treats every
/// field except `url` as optional, so empty `area` and missing `published`
/// are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedItem {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub published: Option<NaiveDate>,
    pub source: String,
    pub source_url: String,
    pub summary: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub area: String,
    pub label: Label,
    pub found_at: DateTime<Utc>,
}

impl EnrichedItem {
    pub fn from_raw(raw: RawItem, area: String, label: Label, found_at: DateTime<Utc>) -> Self {
        Self {
            title: raw.title,
            url: raw.url,
            published: raw.published,
            source: raw.source,
            source_url: raw.source_url,
            summary: raw.summary,
            area,
            label,
            found_at,
        }
    }
}

// src/classify.rs
//! Coarse category labelling. Precedence is fixed and first-match-wins:
//! hate terms, then court/legal-process terms, then the pride keyword,
//! then the generic default.

use serde::{Deserialize, Serialize};

use crate::signals::TextSignals;

/// Closed set of output categories. The wire strings match what the viewer
/// renders in its type filter dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "Hate crime")]
    HateCrime,
    #[serde(rename = "Court")]
    Court,
    #[serde(rename = "Pride")]
    Pride,
    #[serde(rename = "Update")]
    Update,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::HateCrime => "Hate crime",
            Label::Court => "Court",
            Label::Pride => "Pride",
            Label::Update => "Update",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total over any input: every text maps to exactly one label.
pub fn classify(signals: &TextSignals, text: &str) -> Label {
    if signals.has_hate_signal(text) {
        Label::HateCrime
    } else if signals.has_court_signal(text) {
        Label::Court
    } else if text.to_lowercase().contains("pride") {
        Label::Pride
    } else {
        Label::Update
    }
}

// src/state.rs
//! Persisted seen-URL state. Loaded once at run start, grown monotonically
//! during the run (additions only), written once at run end with the size
//! cap applied by dropping the oldest entries. A URL present here is never
//! re-emitted in a later run's output.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    seen_urls: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SeenState {
    order: Vec<String>,
    set: HashSet<String>,
}

impl SeenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from disk; a missing file is an empty state, any other failure
    /// is fatal for the run.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading seen state from {}", path.display()))?;
        let file: StateFile = serde_json::from_str(&content)
            .with_context(|| format!("parsing seen state at {}", path.display()))?;
        let mut state = Self::new();
        for url in file.seen_urls {
            state.insert(&url);
        }
        Ok(state)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.set.contains(url)
    }

    /// Returns true if the URL was newly inserted.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.set.insert(url.to_string()) {
            self.order.push(url.to_string());
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Persist, bounded to `cap` entries; the oldest entries drop first.
    pub fn save(&mut self, path: &Path, cap: usize) -> Result<()> {
        if self.order.len() > cap {
            let excess = self.order.len() - cap;
            for url in self.order.drain(0..excess) {
                self.set.remove(&url);
            }
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating state dir {}", parent.display()))?;
        }
        let file = StateFile {
            seen_urls: self.order.clone(),
        };
        let json = serde_json::to_string_pretty(&file).context("serializing seen state")?;
        fs::write(path, json)
            .with_context(|| format!("writing seen state to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_monotone_and_dedups() {
        let mut s = SeenState::new();
        assert!(s.insert("https://a.test/1"));
        assert!(!s.insert("https://a.test/1"));
        assert!(s.contains("https://a.test/1"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn save_applies_cap_dropping_oldest() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("seen.json");
        let mut s = SeenState::new();
        for i in 0..5 {
            s.insert(&format!("https://a.test/{i}"));
        }
        s.save(&path, 3).unwrap();
        assert!(!s.contains("https://a.test/0"));
        assert!(s.contains("https://a.test/4"));

        let reloaded = SeenState::load(&path).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert!(reloaded.contains("https://a.test/2"));
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let s = SeenState::load(&tmp.path().join("absent.json")).unwrap();
        assert!(s.is_empty());
    }
}

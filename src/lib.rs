// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod classify;
pub mod config;
pub mod location;
pub mod pipeline;
pub mod queries;
pub mod signals;
pub mod sources;
pub mod state;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::classify::{classify, Label};
pub use crate::config::TrackerConfig;
pub use crate::location::LocationResolver;
pub use crate::pipeline::{Pipeline, RunReport};
pub use crate::signals::TextSignals;
pub use crate::sources::{SourceError, SourceFetcher};
pub use crate::state::SeenState;
pub use crate::types::{EnrichedItem, RawItem};

//! Task enrichment pipeline
//!
//! Turns raw descriptions into complete task drafts (category, type,
//! duration) and feeds them to the store.

mod pipeline;

pub use pipeline::{Enrichment, EnrichmentPipeline, FormPrediction, QuickAddError};

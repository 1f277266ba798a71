//! Prediction outcome errors

use std::time::Duration;
use thiserror::Error;

use crate::llm::LlmError;

/// Why a prediction produced no usable value
///
/// Every call site must handle all branches; callers with a fallback (the
/// splitter, enrichment) treat them alike, the dedicated tools report them.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The model service failed (network, HTTP error, rate limit)
    #[error("Model call failed for {operation}: {source}")]
    Model {
        operation: &'static str,
        #[source]
        source: LlmError,
    },

    /// The reply did not match the operation's output shape
    #[error("Reply for {operation} does not match its output shape: {details}")]
    Shape { operation: &'static str, details: String },

    /// The per-call deadline expired
    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: &'static str, after: Duration },

    /// The instruction template could not be loaded or rendered
    #[error("Prompt template error: {0}")]
    Template(String),
}

impl PredictionError {
    /// The failure came from the model service or its deadline
    pub fn is_model_failure(&self) -> bool {
        matches!(self, PredictionError::Model { .. } | PredictionError::Timeout { .. })
    }

    /// The model answered but the answer was unusable
    pub fn is_shape_failure(&self) -> bool {
        matches!(self, PredictionError::Shape { .. })
    }

    /// Retrying is pointless until the provider or API key is fixed
    pub fn needs_setup(&self) -> bool {
        matches!(self, PredictionError::Model { source, .. } if source.is_setup_problem())
    }

    pub fn shape(operation: &'static str, details: impl Into<String>) -> Self {
        PredictionError::Shape {
            operation,
            details: details.into(),
        }
    }
}

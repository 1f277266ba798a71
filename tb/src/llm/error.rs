//! Model service errors
//!
//! Failures on the way to the model and back. A reply that arrives but does
//! not fit an operation is not an `LlmError`; the prediction layer reports it
//! as a shape failure.

use std::time::Duration;
use thiserror::Error;

/// Why the model service gave no reply
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider answered 429
    #[error("Model service is rate limiting, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("Model service returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Every attempt ended in a transient failure
    #[error("Model service still failing after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Option<Box<LlmError>>,
    },

    /// Nothing answered the forced tool call
    #[error("No reply for {tool}")]
    NoReply { tool: String },

    #[error("Unknown LLM provider '{0}' (supported: anthropic, openai)")]
    UnknownProvider(String),

    /// The configured environment variable holds no key
    #[error("LLM API key not found. Set the {0} environment variable.")]
    MissingApiKey(String),
}

impl LlmError {
    /// Worth another attempt after a backoff
    ///
    /// Network failures, request timeouts and server-side errors (including
    /// Anthropic's 529 overload). A 429 is not retried here; it carries its
    /// own wait and is surfaced to the caller as a failed prediction.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::ApiError { status, .. } => matches!(status, 408 | 500 | 502 | 503 | 504 | 529),
            LlmError::Network(_) => true,
            _ => false,
        }
    }

    /// The board cannot work until the user fixes their setup
    pub fn is_setup_problem(&self) -> bool {
        matches!(
            self,
            LlmError::UnknownProvider(_) | LlmError::MissingApiKey(_) | LlmError::ApiError { status: 401 | 403, .. }
        )
    }

    pub(crate) fn exhausted(attempts: u32, last: Option<LlmError>) -> Self {
        LlmError::RetriesExhausted {
            attempts,
            last: last.map(Box::new),
        }
    }
}

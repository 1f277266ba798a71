//! TaskBoard - personal task board with LLM-backed predictions
//!
//! Tasks are typed in as free text, split into separate entries, and enriched
//! with a category, a work type and a duration block predicted by a language
//! model. When the model fails, every path degrades to a usable default rather
//! than losing input.
//!
//! # Core Concepts
//!
//! - **Structured Predictions**: every model call forces a single tool whose
//!   schema is the expected output, then validates the reply
//! - **Category Partition**: each category belongs to exactly one work type,
//!   so a stored task is always consistent
//! - **Single Writer**: the board lives in one actor; all mutation goes
//!   through a pure reducer
//! - **Graceful Degradation**: the splitter and the enricher never drop text
//!
//! # Modules
//!
//! - [`domain`] - task records and the fixed enumerations
//! - [`llm`] - LLM client trait with Anthropic, OpenAI and mock implementations
//! - [`prompts`] - prompt templates (embedded, overridable on disk)
//! - [`predict`] - the typed prediction operations
//! - [`parse`] - splitting free text into task descriptions
//! - [`enrich`] - turning descriptions into complete drafts
//! - [`store`] - the board state and its actor
//! - [`grouping`] - time-block grouping and its audit
//! - [`repl`] - the interactive board
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod enrich;
pub mod grouping;
pub mod llm;
pub mod parse;
pub mod predict;
pub mod prompts;
pub mod repl;
pub mod store;

pub use config::Config;
pub use domain::{Category, Duration, Task, TaskDraft, TaskGroup, TaskId, TaskType};
pub use enrich::EnrichmentPipeline;
pub use llm::{LlmClient, LlmError, create_client};
pub use predict::{PredictionError, Predictor};
pub use store::TaskStore;

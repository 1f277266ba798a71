//! Fallback splitter
//!
//! Turns one block of quick-add text into an ordered list of task
//! descriptions. The model does the clause-level splitting; the guards below
//! make sure one line in always means at least one task out.

use tracing::{debug, info, warn};

use crate::domain::{ValidationError, validate_description};
use crate::predict::Predictor;

/// Where the final task list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitSource {
    /// Model output, trimmed with blanks dropped
    Model,
    /// At least one model entry held a line break; entries were re-split on line breaks
    ModelCollapsed,
    /// Model failed or returned nothing; raw input split on line breaks
    LineFallback,
    /// Whole input used as a single task
    Verbatim,
}

/// Result of splitting one input block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    pub tasks: Vec<String>,
    pub source: SplitSource,
}

/// Split on line breaks, trim each line, drop empty lines
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// LLM-backed splitter
pub struct TaskSplitter<'a> {
    predictor: &'a Predictor,
}

impl<'a> TaskSplitter<'a> {
    pub fn new(predictor: &'a Predictor) -> Self {
        Self { predictor }
    }

    /// Split `text` into task descriptions
    ///
    /// Fails only for empty input. Guard order: model failure or zero tasks
    /// falls back to line splitting; blank entries are dropped and any entry
    /// that still holds a line break is re-split in place.
    pub async fn split(&self, text: &str) -> Result<SplitOutcome, ValidationError> {
        let trimmed = validate_description(text)?;
        debug!(text_len = trimmed.len(), "split: called");

        let outcome = match self.predictor.parse_multiple_tasks(trimmed).await {
            Err(e) => {
                warn!(error = %e, "split: model failed, splitting on line breaks");
                line_fallback(trimmed)
            }
            Ok(output) => {
                let kept: Vec<&str> = output.tasks.iter().map(|t| t.trim()).filter(|t| !t.is_empty()).collect();
                let collapsed = kept.iter().any(|t| t.contains('\n'));
                let tasks: Vec<String> = kept.into_iter().flat_map(split_lines).collect();
                if tasks.is_empty() {
                    warn!("split: model returned no tasks, splitting on line breaks");
                    line_fallback(trimmed)
                } else if collapsed {
                    warn!("split: model kept line breaks inside a task, re-splitting");
                    SplitOutcome {
                        tasks,
                        source: SplitSource::ModelCollapsed,
                    }
                } else {
                    SplitOutcome {
                        tasks,
                        source: SplitSource::Model,
                    }
                }
            }
        };

        info!(count = outcome.tasks.len(), source = ?outcome.source, "split input into tasks");
        Ok(outcome)
    }
}

fn line_fallback(text: &str) -> SplitOutcome {
    let tasks = split_lines(text);
    if tasks.is_empty() {
        return SplitOutcome {
            tasks: vec![text.to_string()],
            source: SplitSource::Verbatim,
        };
    }
    SplitOutcome {
        tasks,
        source: SplitSource::LineFallback,
    }
}

//! Task records
//!
//! `Task` is what the store holds. `TaskDraft` is an unsaved record produced by
//! enrichment or the manual form; the store turns drafts into tasks by
//! assigning ids.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::category::{Category, Duration, TaskType};

/// Minimum description length accepted from the manual form
pub const MIN_FORM_DESCRIPTION_LEN: usize = 3;

/// User input errors, raised before any remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task description must not be empty")]
    EmptyDescription,

    #[error("Description must be at least {min} characters")]
    DescriptionTooShort { min: usize },
}

/// Check a free-text description, returning the trimmed text
pub fn validate_description(description: &str) -> Result<&str, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        debug!("validate_description: empty");
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed)
}

/// Opaque task identifier, assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single unit of work tracked on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub duration: Duration,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_tasks: Option<Vec<String>>,
}

impl Task {
    /// Materialize a draft under a store-assigned id
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            description: draft.description,
            category: draft.category,
            task_type: draft.task_type,
            duration: draft.duration,
            is_completed: draft.is_completed,
            sub_tasks: draft.sub_tasks,
        }
    }

    /// True when `task_type` is the group of `category`
    pub fn is_consistent(&self) -> bool {
        self.category.group() == self.task_type
    }

    /// History entry fed back to the personalization prompt
    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            task_description: self.description.clone(),
            task_type: self.task_type,
            duration: self.duration,
        }
    }
}

/// An unsaved, fully specified task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub description: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub duration: Duration,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_tasks: Option<Vec<String>>,
}

impl TaskDraft {
    /// Build a draft whose type is derived from the category
    pub fn new(description: impl Into<String>, category: Category, duration: Duration) -> Self {
        Self {
            description: description.into(),
            category,
            task_type: category.group(),
            duration,
            is_completed: false,
            sub_tasks: None,
        }
    }

    /// Under-enriched record used when prediction fails
    pub fn fallback(description: impl Into<String>) -> Self {
        debug!("TaskDraft::fallback: called");
        Self::new(description, Category::DEFAULT, Duration::DEFAULT)
    }

    /// Manual form submission
    ///
    /// The form picks category and duration explicitly; the type still follows
    /// the category.
    pub fn from_form(description: &str, category: Category, duration: Duration) -> Result<Self, ValidationError> {
        debug!(%category, %duration, "TaskDraft::from_form: called");
        let trimmed = validate_description(description)?;
        if trimmed.chars().count() < MIN_FORM_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooShort {
                min: MIN_FORM_DESCRIPTION_LEN,
            });
        }
        Ok(Self::new(trimmed, category, duration))
    }

    /// Attach sub-tasks from the decomposition tool
    pub fn with_sub_tasks(mut self, sub_tasks: Vec<String>) -> Self {
        self.sub_tasks = Some(sub_tasks);
        self
    }

    pub fn is_consistent(&self) -> bool {
        self.category.group() == self.task_type
    }
}

/// One row of task history sent to the personalization prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub task_description: String,
    pub task_type: TaskType,
    pub duration: Duration,
}

/// A cluster of tasks proposed by the grouping operation (never stored)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGroup {
    pub group_name: String,
    pub task_ids: Vec<TaskId>,
    #[serde(deserialize_with = "minutes_from_number")]
    pub total_duration: u32,
}

/// Accept whole minutes written as `45` or `45.0`; `45.6` is an error
fn minutes_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw < 0.0 || raw > f64::from(u32::MAX) || raw.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!("invalid minute count {}", raw)));
    }
    Ok(raw as u32)
}

//! Domain types for the task board
//!
//! - [`Category`], [`TaskType`], [`Duration`] - the fixed enumerations shared with the model
//! - [`Task`] / [`TaskDraft`] - stored and unsaved task records
//! - [`TaskGroup`] - ephemeral grouping output

mod category;
mod task;

pub use category::{CATEGORY_GROUPS, Category, Duration, TaskType};
pub use task::{
    HistoryEntry, MIN_FORM_DESCRIPTION_LEN, Task, TaskDraft, TaskGroup, TaskId, ValidationError, validate_description,
};

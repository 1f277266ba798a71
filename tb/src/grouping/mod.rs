//! Task grouping
//!
//! Asks the model to cluster incomplete tasks into work blocks of at most an
//! hour, then audits the answer. Model output is reported, never repaired.

mod audit;

pub use audit::{GROUP_CAPACITY_MINUTES, PolicyViolation, audit_groups};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Task, TaskGroup};
use crate::predict::{GroupTaskInput, PredictionError, Predictor};
use crate::store::{StoreError, TaskStore};

/// Errors from the grouping tool
#[derive(Debug, Error)]
pub enum GroupingError {
    #[error("You have no tasks to group.")]
    NothingToGroup,

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A group with its ids resolved against the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGroup {
    pub group_name: String,
    pub total_duration: u32,
    pub tasks: Vec<Task>,
}

/// What the grouping tool shows
#[derive(Debug, Clone)]
pub struct GroupingReport {
    /// Groups exactly as the model returned them
    pub groups: Vec<TaskGroup>,
    /// Groups with task records; unknown ids are skipped
    pub resolved: Vec<ResolvedGroup>,
    /// Policy breaches found in the model's answer
    pub violations: Vec<PolicyViolation>,
}

/// Group the board's incomplete tasks
pub async fn group_incomplete(store: &TaskStore, predictor: &Predictor) -> Result<GroupingReport, GroupingError> {
    debug!("group_incomplete: called");
    let snapshot = store.snapshot().await?;
    let incomplete: Vec<Task> = snapshot.incomplete().into_iter().cloned().collect();
    if incomplete.is_empty() {
        return Err(GroupingError::NothingToGroup);
    }

    let inputs = incomplete
        .iter()
        .map(|t| GroupTaskInput {
            id: t.id.clone(),
            description: t.description.clone(),
            duration: t.duration,
        })
        .collect();
    let output = predictor.group_similar_tasks(inputs).await?;
    let groups = output.grouped_tasks;

    let violations = audit_groups(&groups, &incomplete);
    for violation in &violations {
        warn!(%violation, "group_incomplete: model output breaks grouping policy");
    }

    let resolved = groups
        .iter()
        .map(|group| ResolvedGroup {
            group_name: group.group_name.clone(),
            total_duration: group.total_duration,
            tasks: group
                .task_ids
                .iter()
                .filter_map(|id| incomplete.iter().find(|t| &t.id == id).cloned())
                .collect(),
        })
        .collect();

    info!(groups = groups.len(), violations = violations.len(), "grouped incomplete tasks");
    Ok(GroupingReport {
        groups,
        resolved,
        violations,
    })
}

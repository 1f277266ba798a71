//! Board state and the pure reducer
//!
//! All five commands are total: a command naming an unknown id leaves the
//! state unchanged. Ids are assigned here, never by callers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::{Task, TaskDraft, TaskId};

/// Commands understood by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Add one task at the front
    AddTask(TaskDraft),
    /// Add a batch at the front, keeping batch order
    AddTasks(Vec<TaskDraft>),
    /// Replace the task with the same id
    UpdateTask(Task),
    /// Remove a task
    DeleteTask(TaskId),
    /// Set the completion flag
    SetCompleted { id: TaskId, completed: bool },
}

impl TaskCommand {
    /// Id of the existing task this command targets, if any
    pub fn target(&self) -> Option<&TaskId> {
        match self {
            TaskCommand::AddTask(_) | TaskCommand::AddTasks(_) => None,
            TaskCommand::UpdateTask(task) => Some(&task.id),
            TaskCommand::DeleteTask(id) | TaskCommand::SetCompleted { id, .. } => Some(id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaskCommand::AddTask(_) => "add_task",
            TaskCommand::AddTasks(_) => "add_tasks",
            TaskCommand::UpdateTask(_) => "update_task",
            TaskCommand::DeleteTask(_) => "delete_task",
            TaskCommand::SetCompleted { .. } => "set_completed",
        }
    }
}

/// The whole board: tasks newest first, plus the id allocator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub tasks: Vec<Task>,
    id_prefix: String,
    next_seq: u64,
}

impl BoardState {
    /// Empty board whose ids start with `id_prefix`
    pub fn new(id_prefix: impl Into<String>) -> Self {
        Self {
            tasks: Vec::new(),
            id_prefix: id_prefix.into(),
            next_seq: 1,
        }
    }

    /// Empty board with an id prefix derived from the session start
    pub fn starting_at(started: DateTime<Utc>) -> Self {
        Self::new(started.format("%y%m%d%H%M%S").to_string())
    }

    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    fn allocate(&mut self, draft: TaskDraft) -> Task {
        let id = TaskId::new(format!("{}-{}", self.id_prefix, self.next_seq));
        self.next_seq += 1;
        Task::from_draft(id, draft)
    }
}

/// Apply one command
pub fn reduce(mut state: BoardState, command: TaskCommand) -> BoardState {
    debug!(command = command.name(), "reduce: called");
    match command {
        TaskCommand::AddTask(draft) => {
            let task = state.allocate(draft);
            state.tasks.insert(0, task);
        }
        TaskCommand::AddTasks(drafts) => {
            let mut added: Vec<Task> = drafts.into_iter().map(|d| state.allocate(d)).collect();
            added.append(&mut state.tasks);
            state.tasks = added;
        }
        TaskCommand::UpdateTask(task) => {
            if let Some(slot) = state.tasks.iter_mut().find(|t| t.id == task.id) {
                *slot = task;
            }
        }
        TaskCommand::DeleteTask(id) => {
            state.tasks.retain(|t| t.id != id);
        }
        TaskCommand::SetCompleted { id, completed } => {
            if let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) {
                task.is_completed = completed;
            }
        }
    }
    state
}

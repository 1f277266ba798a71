//! TaskStore - actor that owns the board
//!
//! Commands are applied one at a time by a single task; every caller gets a
//! consistent snapshot back.

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::domain::{HistoryEntry, Task, TaskDraft, TaskId};

use super::messages::{Dispatched, StoreError, StoreMessage, StoreResponse};
use super::reducer::{BoardState, TaskCommand, reduce};

/// Handle to send commands to the board actor
#[derive(Clone)]
pub struct TaskStore {
    tx: mpsc::Sender<StoreMessage>,
}

impl TaskStore {
    /// Spawn an empty board for a new session
    pub fn spawn() -> Self {
        Self::spawn_with(BoardState::starting_at(Utc::now()))
    }

    /// Spawn an actor owning `state`
    pub fn spawn_with(state: BoardState) -> Self {
        debug!(id_prefix = %state.id_prefix(), "spawn_with: called");
        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(actor_loop(state, rx));
        info!("TaskStore spawned");
        Self { tx }
    }

    async fn send(&self, command: TaskCommand) -> StoreResponse<Dispatched> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(StoreMessage::Dispatch {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| StoreError::ChannelError)?;
        reply_rx.await.map_err(|_| StoreError::ChannelError)
    }

    /// Apply a command and return the resulting board
    pub async fn dispatch(&self, command: TaskCommand) -> StoreResponse<BoardState> {
        debug!(command = command.name(), "dispatch: called");
        Ok(self.send(command).await?.state)
    }

    /// Add one task; returns it with its assigned id
    pub async fn add_task(&self, draft: TaskDraft) -> StoreResponse<Task> {
        debug!(description = %draft.description, "add_task: called");
        let dispatched = self.send(TaskCommand::AddTask(draft)).await?;
        dispatched
            .state
            .tasks
            .into_iter()
            .next()
            .ok_or(StoreError::ChannelError)
    }

    /// Add a batch in one command; returns the new tasks in batch order
    pub async fn add_tasks(&self, drafts: Vec<TaskDraft>) -> StoreResponse<Vec<Task>> {
        let count = drafts.len();
        debug!(count, "add_tasks: called");
        let dispatched = self.send(TaskCommand::AddTasks(drafts)).await?;
        Ok(dispatched.state.tasks.into_iter().take(count).collect())
    }

    /// Replace a task; false if its id is not on the board
    pub async fn update_task(&self, task: Task) -> StoreResponse<bool> {
        debug!(id = %task.id, "update_task: called");
        Ok(self.send(TaskCommand::UpdateTask(task)).await?.applied)
    }

    pub async fn delete_task(&self, id: TaskId) -> StoreResponse<bool> {
        debug!(%id, "delete_task: called");
        Ok(self.send(TaskCommand::DeleteTask(id)).await?.applied)
    }

    pub async fn set_completed(&self, id: TaskId, completed: bool) -> StoreResponse<bool> {
        debug!(%id, completed, "set_completed: called");
        Ok(self.send(TaskCommand::SetCompleted { id, completed }).await?.applied)
    }

    /// Current board
    pub async fn snapshot(&self) -> StoreResponse<BoardState> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(StoreMessage::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| StoreError::ChannelError)?;
        reply_rx.await.map_err(|_| StoreError::ChannelError)
    }

    /// Every task on the board as personalization history
    pub async fn history(&self) -> StoreResponse<Vec<HistoryEntry>> {
        Ok(self.snapshot().await?.history())
    }

    /// Stop the actor; later calls fail with `ChannelError`
    pub async fn shutdown(&self) -> StoreResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(StoreMessage::Shutdown)
            .await
            .map_err(|_| StoreError::ChannelError)
    }
}

async fn actor_loop(mut state: BoardState, mut rx: mpsc::Receiver<StoreMessage>) {
    debug!("actor_loop: called");

    while let Some(message) = rx.recv().await {
        match message {
            StoreMessage::Dispatch { command, reply } => {
                debug!(command = command.name(), "actor_loop: Dispatch");
                let applied = command.target().is_none_or(|id| state.get(id).is_some());
                state = reduce(state, command);
                let _ = reply.send(Dispatched {
                    state: state.clone(),
                    applied,
                });
            }

            StoreMessage::Snapshot { reply } => {
                debug!("actor_loop: Snapshot");
                let _ = reply.send(state.clone());
            }

            StoreMessage::Shutdown => {
                info!("TaskStore shutting down");
                break;
            }
        }
    }

    debug!("TaskStore actor stopped");
}

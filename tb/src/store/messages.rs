//! Task store messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use super::reducer::{BoardState, TaskCommand};

/// Errors from store operations
///
/// Commands themselves are total; only the channel to the actor can fail.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task store is not running")]
    ChannelError,
}

/// Response from store operations
pub type StoreResponse<T> = Result<T, StoreError>;

/// What a dispatched command did
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// Board after the command
    pub state: BoardState,
    /// False when the command named an id that was not on the board
    pub applied: bool,
}

/// Messages sent to the TaskStore actor
#[derive(Debug)]
pub enum StoreMessage {
    Dispatch {
        command: TaskCommand,
        reply: oneshot::Sender<Dispatched>,
    },
    Snapshot {
        reply: oneshot::Sender<BoardState>,
    },
    Shutdown,
}

//! Task store
//!
//! A pure reducer over `BoardState` plus a thin actor handle (`TaskStore`)
//! that applies commands serially.

mod manager;
mod messages;
mod reducer;
mod views;

pub use manager::TaskStore;
pub use messages::{Dispatched, StoreError, StoreResponse};
pub use reducer::{BoardState, TaskCommand, reduce};

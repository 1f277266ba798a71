//! Multi-task parser with layered fallback

mod splitter;

pub use splitter::{SplitOutcome, SplitSource, TaskSplitter, split_lines};

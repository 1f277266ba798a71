//! Interactive board REPL
//!
//! Plain lines are quick-added; slash commands drive the board and the
//! prediction tools.

mod commands;
mod session;

pub use commands::{FormInput, ReplCommand};
pub use session::{BoardSession, LineResult};

use std::sync::Arc;

use eyre::Result;

use crate::config::Config;
use crate::llm::create_client;
use crate::predict::Predictor;
use crate::store::TaskStore;

/// Run the interactive board
///
/// This is the main entry point for `tb` and `tb repl`.
pub async fn run_interactive(config: &Config, initial_input: Option<String>) -> Result<()> {
    config.validate()?;

    let llm = create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;
    let predictor = Arc::new(Predictor::from_config(llm, &config.prediction));
    let store = TaskStore::spawn();

    let mut session = BoardSession::new(predictor, store);
    session.run(initial_input).await
}

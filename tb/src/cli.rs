//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TaskBoard - personal task board with LLM-backed predictions
#[derive(Parser)]
#[command(
    name = "tb",
    about = "Personal task board: categorize, estimate, decompose and group tasks with an LLM",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to the interactive board)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive board
    Repl {
        /// Text to quick-add before the prompt appears
        input: Option<String>,
    },

    /// Pick the category of a task
    Categorize {
        /// Task description
        text: String,
    },

    /// Classify a task as deep, light or admin work
    Classify {
        /// Task description
        text: String,
    },

    /// Estimate a task's duration block
    Estimate {
        /// Task description
        text: String,
    },

    /// Break a large task into sub-tasks
    Decompose {
        /// Task description
        text: String,
    },

    /// Split text into separate task descriptions
    Split {
        /// Free text holding one or more tasks
        text: String,
    },

    /// Show the category table (no model call)
    Categories,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["tb", "-l", "debug", "classify", "Write the report"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Some(Command::Classify { ref text }) if text == "Write the report"));

        let cli = Cli::try_parse_from(["tb"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["tb", "categories", "--config", "x.yml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
    }
}

//! TaskBoard - personal task board
//!
//! CLI entry point: the interactive board plus one-shot prediction commands.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use taskboard::cli::{Cli, Command};
use taskboard::config::Config;
use taskboard::domain::{TaskType, validate_description};
use taskboard::llm::create_client;
use taskboard::parse::TaskSplitter;
use taskboard::predict::Predictor;
use taskboard::repl;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskboard")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("taskboard.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "TaskBoard loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None => repl::run_interactive(&config, None).await,
        Some(Command::Repl { input }) => repl::run_interactive(&config, input).await,
        Some(Command::Categories) => {
            cmd_categories();
            Ok(())
        }
        Some(Command::Categorize { text }) => {
            let output = build_predictor(&config)?.categorize_task(validate_description(&text)?).await?;
            println!("{} ({})", output.category, output.category.group());
            Ok(())
        }
        Some(Command::Classify { text }) => {
            let output = build_predictor(&config)?.classify_task_type(validate_description(&text)?).await?;
            println!("{}", output.task_type);
            println!("{}", output.reasoning.dimmed());
            Ok(())
        }
        Some(Command::Estimate { text }) => {
            let output = build_predictor(&config)?.estimate_task_duration(validate_description(&text)?).await?;
            println!("{}", output.estimated_duration);
            Ok(())
        }
        Some(Command::Decompose { text }) => {
            let output = build_predictor(&config)?.decompose_large_task(validate_description(&text)?).await?;
            for (i, sub_task) in output.sub_tasks.iter().enumerate() {
                println!("{}. {}", i + 1, sub_task);
            }
            Ok(())
        }
        Some(Command::Split { text }) => cmd_split(&config, &text).await,
    }
}

/// Print the category partition table
fn cmd_categories() {
    for task_type in TaskType::ALL {
        println!("{} ({})", task_type.title().bright_cyan().bold(), task_type);
        for category in task_type.categories() {
            println!("  {:28} {}", category.label(), category.guidance().dimmed());
        }
    }
}

/// Build a predictor for one-shot commands
fn build_predictor(config: &Config) -> Result<Predictor> {
    config.validate()?;
    let llm = create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;
    Ok(Predictor::from_config(llm, &config.prediction))
}

/// Split free text and print one task per line
async fn cmd_split(config: &Config, text: &str) -> Result<()> {
    let predictor = build_predictor(config)?;
    let outcome = TaskSplitter::new(&predictor).split(text).await?;
    debug!(source = ?outcome.source, count = outcome.tasks.len(), "cmd_split: done");
    for task in outcome.tasks {
        println!("{}", task);
    }
    Ok(())
}

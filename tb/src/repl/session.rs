//! REPL session management

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::domain::{Category, Duration, Task, TaskDraft, TaskType, validate_description};
use crate::enrich::EnrichmentPipeline;
use crate::grouping::{GroupingError, group_incomplete};
use crate::predict::{PredictionError, Predictor};
use crate::store::{BoardState, TaskStore};

use super::commands::{FormInput, ReplCommand};

/// Interactive board session
pub struct BoardSession {
    predictor: Arc<Predictor>,
    store: TaskStore,
}

/// Result of handling one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineResult {
    Continue,
    Quit,
}

impl BoardSession {
    pub fn new(predictor: Arc<Predictor>, store: TaskStore) -> Self {
        Self { predictor, store }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Run the REPL main loop
    pub async fn run(&mut self, initial_input: Option<String>) -> Result<()> {
        self.print_welcome();

        if let Some(input) = initial_input {
            println!("{} {}", ">".bright_green(), input);
            self.handle_line(&input).await?;
        }

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            match rl.readline(&format!("{} ", ">".bright_green())) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    if self.handle_line(input).await? == LineResult::Quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        self.store.shutdown().await?;
        println!("Goodbye!");
        Ok(())
    }

    /// Handle one line of input
    ///
    /// Prediction failures are printed and leave the board unchanged; only a
    /// dead store is an error.
    pub async fn handle_line(&mut self, input: &str) -> Result<LineResult> {
        let command = ReplCommand::parse(input);
        debug!(?command, "handle_line: called");

        match command {
            ReplCommand::Quit => return Ok(LineResult::Quit),
            ReplCommand::Help => self.print_help(),
            ReplCommand::List(None) => self.print_board().await?,
            ReplCommand::List(Some(label)) => self.print_category(&label).await?,
            ReplCommand::Add(text) => self.quick_add(&text).await?,
            ReplCommand::Form(input) => self.form_add(&input).await?,
            ReplCommand::Done(reference) => self.set_completed(&reference, true).await?,
            ReplCommand::Undo(reference) => self.set_completed(&reference, false).await?,
            ReplCommand::Delete(reference) => self.delete(&reference).await?,
            ReplCommand::Group => self.group().await?,
            ReplCommand::Classify(text) => self.classify(&text).await,
            ReplCommand::Decompose(text) => self.decompose(&text).await?,
            ReplCommand::Estimate(text) => self.estimate(&text).await,
            ReplCommand::Categorize(text) => self.categorize(&text).await,
            ReplCommand::MissingArgument(cmd) => {
                println!("{} {} needs an argument", "?".yellow(), cmd);
            }
            ReplCommand::Unknown(cmd) => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        Ok(LineResult::Continue)
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "TaskBoard".bright_cyan().bold());
        println!("Type a task (or several) to add it. Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Board:".bright_cyan());
        println!("  {:20} Add one or more tasks", "<text>".yellow());
        println!(
            "  {:20} Add one task; fields left out are predicted",
            "/form <text> [| <category> [| <duration>]]".yellow()
        );
        println!("  {:20} Show the board, or one category's open tasks", "/list [category]".yellow());
        println!("  {:20} Mark a task completed", "/done <n|id>".yellow());
        println!("  {:20} Mark a task not completed", "/undo <n|id>".yellow());
        println!("  {:20} Delete a task", "/delete <n|id>".yellow());
        println!("  {:20} Group open tasks into work blocks", "/group".yellow());
        println!();
        println!("{}", "Tools:".bright_cyan());
        println!("  {:20} Classify as deep, light or admin", "/classify <text>".yellow());
        println!("  {:20} Break into sub-tasks (attached when <n|id>)", "/decompose <text>".yellow());
        println!("  {:20} Estimate duration", "/estimate <text>".yellow());
        println!("  {:20} Pick a category", "/categorize <text>".yellow());
        println!();
        println!("  {:20} Show this help", "/help".yellow());
        println!("  {:20} Exit", "/quit".yellow());
        println!();
    }

    async fn print_board(&self) -> Result<()> {
        let board = self.store.snapshot().await?;
        if board.tasks.is_empty() {
            println!("{}", "The board is empty.".dimmed());
            return Ok(());
        }

        let position = |task: &Task| board.tasks.iter().position(|t| t.id == task.id).map_or(0, |p| p + 1);

        println!();
        for task_type in TaskType::ALL {
            let tasks = board.todo_by_type(task_type);
            println!("{} ({})", task_type.title().bright_cyan(), tasks.len());
            for task in tasks {
                println!("  {}", format_task(position(task), task));
            }
        }

        let completed = board.completed();
        if !completed.is_empty() {
            println!("{} ({})", "Completed".bright_cyan(), completed.len());
            for task in completed {
                println!("  {}", format_task(position(task), task).dimmed());
            }
        }
        println!();
        Ok(())
    }

    async fn quick_add(&self, text: &str) -> Result<()> {
        let pipeline = EnrichmentPipeline::new(&self.predictor);
        match pipeline.quick_add(text, &self.store).await {
            Ok(tasks) => {
                for task in &tasks {
                    println!("{} {}", "+".bright_green(), describe(task));
                }
            }
            Err(crate::enrich::QuickAddError::Validation(e)) => println!("{} {}", "Error:".red(), e),
            Err(crate::enrich::QuickAddError::Store(e)) => return Err(e.into()),
        }
        Ok(())
    }

    async fn print_category(&self, label: &str) -> Result<()> {
        let Some(category) = Category::parse(label) else {
            println!("{} Unknown category: {}", "?".yellow(), label);
            return Ok(());
        };
        let board = self.store.snapshot().await?;
        let lines = category_lines(&board, category);
        println!("{} ({})", category.label().bright_cyan(), lines.len());
        for line in lines {
            println!("  {}", line);
        }
        Ok(())
    }

    /// Add one task from the manual form
    ///
    /// Explicit category and duration are used as given. Prediction runs only
    /// when a field was left out, and only fills that field.
    async fn form_add(&self, input: &FormInput) -> Result<()> {
        let category = match input.category.as_deref().map(|label| (label, Category::parse(label))) {
            Some((label, None)) => {
                println!("{} Unknown category: {}", "Error:".red(), label);
                return Ok(());
            }
            Some((_, parsed)) => parsed,
            None => None,
        };
        let duration = match input.duration.as_deref().map(|label| (label, Duration::parse(label))) {
            Some((label, None)) => {
                println!("{} Unknown duration: {} (use 15-minute, 30-minute or 1-hour)", "Error:".red(), label);
                return Ok(());
            }
            Some((_, parsed)) => parsed,
            None => None,
        };

        let (category, duration) = match (category, duration) {
            (Some(category), Some(duration)) => (category, duration),
            (category, duration) => {
                let history = self.store.history().await?;
                let pipeline = EnrichmentPipeline::new(&self.predictor);
                let prediction = match pipeline.predict_form_fields(&input.text, &history).await {
                    Ok(prediction) => prediction,
                    Err(e) => {
                        println!("{} {}", "Error:".red(), e);
                        return Ok(());
                    }
                };
                if prediction.defaulted {
                    println!("{}", "Prediction failed, using defaults.".yellow());
                }
                debug!(
                    explicit_category = category.is_some(),
                    explicit_duration = duration.is_some(),
                    "form_add: filling missing fields from prediction"
                );
                (category.unwrap_or(prediction.category), duration.unwrap_or(prediction.duration))
            }
        };

        match TaskDraft::from_form(&input.text, category, duration) {
            Ok(draft) => {
                let task = self.store.add_task(draft).await?;
                println!("{} {}", "+".bright_green(), describe(&task));
            }
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
        Ok(())
    }

    /// Find a task by id, else by 1-based board position
    async fn resolve(&self, reference: &str) -> Result<Option<Task>> {
        let board = self.store.snapshot().await?;
        let reference = reference.trim();
        if let Some(task) = board.tasks.iter().find(|t| t.id.as_str() == reference) {
            return Ok(Some(task.clone()));
        }
        Ok(reference
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| board.tasks.get(i).cloned()))
    }

    async fn set_completed(&self, reference: &str, completed: bool) -> Result<()> {
        match self.resolve(reference).await? {
            Some(task) => {
                self.store.set_completed(task.id.clone(), completed).await?;
                let mark = if completed { "✓".bright_green() } else { "○".yellow() };
                println!("{} {}", mark, task.description);
            }
            None => println!("{} No task {}", "?".yellow(), reference),
        }
        Ok(())
    }

    async fn delete(&self, reference: &str) -> Result<()> {
        match self.resolve(reference).await? {
            Some(task) => {
                self.store.delete_task(task.id.clone()).await?;
                println!("{} {}", "-".red(), task.description);
            }
            None => println!("{} No task {}", "?".yellow(), reference),
        }
        Ok(())
    }

    async fn group(&self) -> Result<()> {
        match group_incomplete(&self.store, &self.predictor).await {
            Ok(report) => {
                println!();
                for group in &report.resolved {
                    println!(
                        "{} {}",
                        group.group_name.bright_cyan().bold(),
                        format!("({} min)", group.total_duration).dimmed()
                    );
                    for task in &group.tasks {
                        println!("  - {} ({})", task.description, task.duration);
                    }
                }
                if !report.violations.is_empty() {
                    println!();
                    println!("{}", "Heads up, the grouping breaks its own rules:".yellow());
                    for violation in &report.violations {
                        println!("  {} {}", "!".yellow(), violation);
                    }
                }
                println!();
            }
            Err(GroupingError::NothingToGroup) => println!("{}", GroupingError::NothingToGroup.to_string().dimmed()),
            Err(GroupingError::Store(e)) => return Err(e.into()),
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
        Ok(())
    }

    async fn classify(&self, text: &str) {
        if let Err(e) = validate_description(text) {
            println!("{} {}", "Error:".red(), e);
            return;
        }
        match self.predictor.classify_task_type(text).await {
            Ok(output) => {
                println!("{} {}", "Type:".bright_cyan(), output.task_type.title());
                println!("{}", output.reasoning.dimmed());
            }
            Err(e) => report_prediction_error(&e),
        }
    }

    async fn estimate(&self, text: &str) {
        if let Err(e) = validate_description(text) {
            println!("{} {}", "Error:".red(), e);
            return;
        }
        match self.predictor.estimate_task_duration(text).await {
            Ok(output) => println!("{} {}", "Duration:".bright_cyan(), output.estimated_duration),
            Err(e) => report_prediction_error(&e),
        }
    }

    async fn categorize(&self, text: &str) {
        if let Err(e) = validate_description(text) {
            println!("{} {}", "Error:".red(), e);
            return;
        }
        match self.predictor.categorize_task(text).await {
            Ok(output) => println!(
                "{} {} ({})",
                "Category:".bright_cyan(),
                output.category,
                output.category.group().title()
            ),
            Err(e) => report_prediction_error(&e),
        }
    }

    /// Decompose free text, or a board task whose sub-tasks are then attached
    async fn decompose(&self, text: &str) -> Result<()> {
        let target = self.resolve(text).await?;
        let description = target.as_ref().map_or(text, |t| t.description.as_str());
        if let Err(e) = validate_description(description) {
            println!("{} {}", "Error:".red(), e);
            return Ok(());
        }

        let output = match self.predictor.decompose_large_task(description).await {
            Ok(output) => output,
            Err(e) => {
                report_prediction_error(&e);
                return Ok(());
            }
        };

        println!("{}", description.bright_cyan());
        for (i, sub_task) in output.sub_tasks.iter().enumerate() {
            println!("  {}. {}", i + 1, sub_task);
        }

        if let Some(mut task) = target {
            task.sub_tasks = Some(output.sub_tasks);
            if !self.store.update_task(task).await? {
                warn!("decompose: task vanished before sub-tasks were attached");
            }
        }
        Ok(())
    }
}

fn report_prediction_error(e: &PredictionError) {
    println!("{} {}", "Error:".red(), e);
    if e.needs_setup() {
        println!("{}", "Check the llm section of your config and the API key variable it names.".yellow());
    }
}

fn describe(task: &Task) -> String {
    format!("{} [{} / {} / {}]", task.description, task.category, task.task_type, task.duration)
}

/// Open tasks of one category, numbered by board position
fn category_lines(board: &BoardState, category: Category) -> Vec<String> {
    board
        .by_category(category)
        .into_iter()
        .map(|task| {
            let position = board.tasks.iter().position(|t| t.id == task.id).map_or(0, |p| p + 1);
            format_task(position, task)
        })
        .collect()
}

fn format_task(position: usize, task: &Task) -> String {
    let mut line = format!("{:>3}. {} ({}, {})", position, task.description, task.category, task.duration);
    if let Some(sub_tasks) = &task.sub_tasks {
        for sub_task in sub_tasks {
            line.push_str(&format!("\n       - {}", sub_task));
        }
    }
    line
}

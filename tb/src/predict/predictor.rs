//! Predictor - runs structured completions against the LLM service

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::PredictionError;
use super::ops::*;
use crate::config::PredictionConfig;
use crate::domain::HistoryEntry;
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, Message, ToolDefinition};
use crate::prompts::PromptLoader;

/// Runs prediction operations
///
/// Stateless between calls: whatever context an operation needs (task history
/// included) is part of its input and is resent every time.
pub struct Predictor {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    config: PredictionConfig,
}

impl Predictor {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, config: PredictionConfig) -> Self {
        debug!(deadline_ms = config.deadline_ms, "Predictor::new: called");
        Self { llm, prompts, config }
    }

    /// Build a predictor whose templates honor `prompts-dir`
    pub fn from_config(llm: Arc<dyn LlmClient>, config: &PredictionConfig) -> Self {
        let prompts = PromptLoader::new(config.prompts_dir.as_deref());
        Self::new(llm, prompts, config.clone())
    }

    /// Embedded templates and default settings
    pub fn with_defaults(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(llm, PromptLoader::embedded_only(), PredictionConfig::default())
    }

    /// Per-call deadline
    pub fn deadline(&self) -> Duration {
        self.config.deadline()
    }

    /// Run one structured completion and validate the reply
    pub async fn predict<P: Prediction>(&self, input: &P::Input) -> Result<P::Output, PredictionError> {
        let operation = P::NAME;
        let tool_name = P::tool_name();
        debug!(%operation, "predict: called");

        let prompt = self
            .prompts
            .render(P::TEMPLATE, input)
            .map_err(|e| PredictionError::Template(e.to_string()))?;

        let request = CompletionRequest {
            system_prompt: format!(
                "You are the prediction service of a personal task board. \
                 Answer only by calling the {} tool.",
                tool_name
            ),
            messages: vec![Message::user(prompt)],
            tools: vec![ToolDefinition::new(
                tool_name.clone(),
                P::DESCRIPTION,
                P::output_schema(),
            )],
            tool_choice: Some(tool_name.clone()),
            max_tokens: self.config.max_tokens,
        };

        let deadline = self.deadline();
        let response = match tokio::time::timeout(deadline, self.llm.complete(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(source)) => {
                warn!(%operation, error = %source, "predict: model call failed");
                return Err(PredictionError::Model { operation, source });
            }
            Err(_) => {
                warn!(%operation, ?deadline, "predict: deadline expired");
                return Err(PredictionError::Timeout {
                    operation,
                    after: deadline,
                });
            }
        };

        let candidate = candidate_value(&response, &tool_name)
            .ok_or_else(|| PredictionError::shape(operation, "reply holds no tool call and no JSON object"))?;

        let output: P::Output =
            serde_json::from_value(candidate).map_err(|e| PredictionError::shape(operation, e.to_string()))?;

        let output = P::validate(output).map_err(|details| {
            warn!(%operation, %details, "predict: reply failed validation");
            PredictionError::shape(operation, details)
        })?;

        info!(%operation, "prediction succeeded");
        Ok(output)
    }

    pub async fn categorize_task(&self, description: &str) -> Result<CategorizeOutput, PredictionError> {
        let input = CategorizeInput {
            description: description.to_string(),
        };
        self.predict::<CategorizeTask>(&input).await
    }

    pub async fn classify_task_type(&self, task_description: &str) -> Result<ClassifyOutput, PredictionError> {
        let input = ClassifyInput {
            task_description: task_description.to_string(),
        };
        self.predict::<ClassifyTaskType>(&input).await
    }

    pub async fn estimate_task_duration(&self, task_description: &str) -> Result<EstimateOutput, PredictionError> {
        let input = EstimateInput {
            task_description: task_description.to_string(),
        };
        self.predict::<EstimateTaskDuration>(&input).await
    }

    pub async fn decompose_large_task(&self, task: &str) -> Result<DecomposeOutput, PredictionError> {
        let input = DecomposeInput { task: task.to_string() };
        self.predict::<DecomposeLargeTask>(&input).await
    }

    /// Predict type and duration from the caller's whole task history
    pub async fn personalize_task_predictions(
        &self,
        historical_data: &[HistoryEntry],
        new_task_description: &str,
    ) -> Result<PersonalizeOutput, PredictionError> {
        let input = PersonalizeInput {
            historical_data: historical_data.to_vec(),
            new_task_description: new_task_description.to_string(),
        };
        self.predict::<PersonalizeTaskPredictions>(&input).await
    }

    /// Cluster tasks into work blocks
    ///
    /// An empty task list returns no groups without calling the model.
    pub async fn group_similar_tasks(&self, tasks: Vec<GroupTaskInput>) -> Result<GroupOutput, PredictionError> {
        if tasks.is_empty() {
            debug!("group_similar_tasks: empty input, skipping model call");
            return Ok(GroupOutput { grouped_tasks: vec![] });
        }
        self.predict::<GroupSimilarTasks>(&GroupInput { tasks }).await
    }

    pub async fn parse_multiple_tasks(&self, text: &str) -> Result<ParseOutput, PredictionError> {
        let input = ParseInput { text: text.to_string() };
        self.predict::<ParseMultipleTasks>(&input).await
    }
}

/// The value to validate: the forced tool's input, else JSON found in text
fn candidate_value(response: &CompletionResponse, tool_name: &str) -> Option<Value> {
    if let Some(input) = response.tool_input(tool_name) {
        return Some(input.clone());
    }

    let text = response.content.as_deref()?;
    debug!(text_len = text.len(), "candidate_value: no tool call, scanning text");
    extract_json(text).and_then(|json| serde_json::from_str(json).ok())
}

/// Find a JSON object in free text: a fenced ```json block, else the outermost braces
fn extract_json(text: &str) -> Option<&str> {
    for fence in ["```json", "```JSON"] {
        if let Some(start) = text.find(fence) {
            let content = &text[start + fence.len()..];
            if let Some(end) = content.find("```") {
                return Some(content[..end].trim());
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        return Some(text[start..=end].trim());
    }
    None
}

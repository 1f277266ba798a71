//! EnrichmentPipeline - per-task predictions, batch enrichment, quick-add

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{
    Category, Duration, HistoryEntry, MIN_FORM_DESCRIPTION_LEN, Task, TaskDraft, TaskType, ValidationError,
    validate_description,
};
use crate::parse::TaskSplitter;
use crate::predict::{PredictionError, Predictor};
use crate::store::{StoreError, TaskStore};

/// Errors from quick-add
#[derive(Debug, Error)]
pub enum QuickAddError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One enriched description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub draft: TaskDraft,
    /// True when prediction failed and the default record was used
    pub defaulted: bool,
}

/// Suggested values for the manual form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormPrediction {
    pub category: Category,
    pub task_type: TaskType,
    pub duration: Duration,
    pub defaulted: bool,
}

impl From<&Enrichment> for FormPrediction {
    fn from(enrichment: &Enrichment) -> Self {
        Self {
            category: enrichment.draft.category,
            task_type: enrichment.draft.task_type,
            duration: enrichment.draft.duration,
            defaulted: enrichment.defaulted,
        }
    }
}

/// Runs the prediction pair for each description
pub struct EnrichmentPipeline<'a> {
    predictor: &'a Predictor,
}

impl<'a> EnrichmentPipeline<'a> {
    pub fn new(predictor: &'a Predictor) -> Self {
        Self { predictor }
    }

    /// Enrich one description
    ///
    /// Personalization and categorization run concurrently and both must
    /// succeed. The type always comes from the category's group; duration
    /// comes from personalization.
    pub async fn enrich(&self, description: &str, history: &[HistoryEntry]) -> Result<TaskDraft, PredictionError> {
        debug!(%description, history_len = history.len(), "enrich: called");
        let (personalized, categorized) = tokio::try_join!(
            self.predictor.personalize_task_predictions(history, description),
            self.predictor.categorize_task(description),
        )?;

        let draft = TaskDraft::new(description, categorized.category, personalized.predicted_duration);
        if personalized.predicted_task_type != draft.task_type {
            debug!(
                predicted = %personalized.predicted_task_type,
                derived = %draft.task_type,
                category = %draft.category,
                "enrich: predicted type disagrees with category, using category group"
            );
        }
        Ok(draft)
    }

    /// Enrich one description, falling back to the default record
    pub async fn enrich_or_default(&self, description: &str, history: &[HistoryEntry]) -> Enrichment {
        match self.enrich(description, history).await {
            Ok(draft) => Enrichment { draft, defaulted: false },
            Err(e) => {
                warn!(%description, error = %e, "enrich_or_default: prediction failed, using default record");
                Enrichment {
                    draft: TaskDraft::fallback(description),
                    defaulted: true,
                }
            }
        }
    }

    /// Enrich many descriptions concurrently
    ///
    /// Each item is defaulted on its own; output order matches input order.
    pub async fn enrich_batch(&self, descriptions: &[String], history: &[HistoryEntry]) -> Vec<Enrichment> {
        debug!(count = descriptions.len(), "enrich_batch: called");
        join_all(descriptions.iter().map(|d| self.enrich_or_default(d, history))).await
    }

    /// Suggest category, type and duration for the manual form
    pub async fn predict_form_fields(
        &self,
        description: &str,
        history: &[HistoryEntry],
    ) -> Result<FormPrediction, ValidationError> {
        let trimmed = validate_description(description)?;
        if trimmed.chars().count() < MIN_FORM_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooShort {
                min: MIN_FORM_DESCRIPTION_LEN,
            });
        }
        let enrichment = self.enrich_or_default(trimmed, history).await;
        Ok(FormPrediction::from(&enrichment))
    }

    /// Split, enrich and add quick-add text as one batch
    ///
    /// Returns the new tasks in input order. Only empty input is rejected;
    /// model failures at any stage degrade to line splitting and default
    /// records.
    pub async fn quick_add(&self, text: &str, store: &TaskStore) -> Result<Vec<Task>, QuickAddError> {
        debug!(text_len = text.len(), "quick_add: called");
        let outcome = TaskSplitter::new(self.predictor).split(text).await?;

        let history = store.history().await?;
        let enrichments = self.enrich_batch(&outcome.tasks, &history).await;

        let defaulted = enrichments.iter().filter(|e| e.defaulted).count();
        if defaulted > 0 {
            warn!(defaulted, total = enrichments.len(), "quick_add: some tasks used the default record");
        }

        let drafts = enrichments.into_iter().map(|e| e.draft).collect();
        let tasks = store.add_tasks(drafts).await?;
        info!(count = tasks.len(), source = ?outcome.source, "quick-added tasks");
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PredictionConfig;
    use crate::llm::{MockLlmClient, MockReply};
    use crate::prompts::PromptLoader;
    use crate::store::BoardState;
    use serde_json::json;
    use std::sync::Arc;

    const PERSONALIZE: &str = "submit_personalize_task_predictions";
    const CATEGORIZE: &str = "submit_categorize_task";
    const PARSE: &str = "submit_parse_multiple_tasks";

    fn predictor(mock: MockLlmClient) -> Predictor {
        Predictor::with_defaults(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_category_group_wins_over_predicted_type() {
        let predictor = predictor(
            MockLlmClient::new()
                .push(
                    PERSONALIZE,
                    MockReply::Tool(json!({ "predictedTaskType": "deep", "predictedDuration": "15-minute" })),
                )
                .push(CATEGORIZE, MockReply::Tool(json!({ "category": "Communication" }))),
        );

        let draft = EnrichmentPipeline::new(&predictor)
            .enrich("Reply to client email", &[])
            .await
            .unwrap();

        assert_eq!(draft.category, Category::Communication);
        assert_eq!(draft.task_type, TaskType::Light);
        assert_eq!(draft.duration, Duration::FifteenMinutes);
        assert!(!draft.is_completed);
    }

    #[tokio::test]
    async fn test_either_failure_fails_enrichment() {
        let predictor = predictor(
            MockLlmClient::new()
                .push(
                    PERSONALIZE,
                    MockReply::Tool(json!({ "predictedTaskType": "admin", "predictedDuration": "15-minute" })),
                )
                .push(CATEGORIZE, MockReply::Fail("down".to_string())),
        );

        let pipeline = EnrichmentPipeline::new(&predictor);
        assert!(pipeline.enrich("Pay rent", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_enrich_or_default_uses_fallback_record() {
        let predictor = predictor(MockLlmClient::new());
        let enrichment = EnrichmentPipeline::new(&predictor).enrich_or_default("Pay rent", &[]).await;

        assert!(enrichment.defaulted);
        assert_eq!(enrichment.draft, TaskDraft::fallback("Pay rent"));
    }

    #[tokio::test]
    async fn test_timeout_defaults_like_failure() {
        let mock = Arc::new(
            MockLlmClient::new()
                .always(PERSONALIZE, MockReply::Hang)
                .always(CATEGORIZE, MockReply::Tool(json!({ "category": "Research & Learning" }))),
        );
        let config = PredictionConfig {
            deadline_ms: 50,
            ..PredictionConfig::default()
        };
        let predictor = Predictor::new(mock, PromptLoader::embedded_only(), config);

        let enrichment = EnrichmentPipeline::new(&predictor)
            .enrich_or_default("Read the paper", &[])
            .await;
        assert!(enrichment.defaulted);
        assert_eq!(enrichment.draft.category, Category::Communication);
    }

    #[tokio::test]
    async fn test_batch_defaults_each_item_independently() {
        // Categorize answers once, then has no script: the second item fails
        let predictor = predictor(
            MockLlmClient::new()
                .always(
                    PERSONALIZE,
                    MockReply::Tool(json!({ "predictedTaskType": "deep", "predictedDuration": "1-hour" })),
                )
                .push(CATEGORIZE, MockReply::Tool(json!({ "category": "Creative Production" }))),
        );

        let descriptions = vec!["Write essay".to_string(), "Something else".to_string()];
        let enrichments = EnrichmentPipeline::new(&predictor)
            .enrich_batch(&descriptions, &[])
            .await;

        assert_eq!(enrichments.len(), 2);
        assert_eq!(enrichments[0].draft.description, "Write essay");
        assert_eq!(enrichments[1].draft.description, "Something else");
        assert_eq!(enrichments.iter().filter(|e| e.defaulted).count(), 1);
        assert!(enrichments.iter().all(|e| e.draft.is_consistent()));
    }

    #[tokio::test]
    async fn test_predict_form_fields() {
        let predictor = predictor(
            MockLlmClient::new()
                .push(
                    PERSONALIZE,
                    MockReply::Tool(json!({ "predictedTaskType": "admin", "predictedDuration": "15-minute" })),
                )
                .push(CATEGORIZE, MockReply::Tool(json!({ "category": "Scheduling & Calendar" }))),
        );
        let pipeline = EnrichmentPipeline::new(&predictor);

        assert_eq!(
            pipeline.predict_form_fields("ab", &[]).await,
            Err(ValidationError::DescriptionTooShort { min: 3 })
        );

        let prediction = pipeline.predict_form_fields("Book dentist", &[]).await.unwrap();
        assert_eq!(prediction.category, Category::SchedulingCalendar);
        assert_eq!(prediction.task_type, TaskType::Admin);
        assert_eq!(prediction.duration, Duration::FifteenMinutes);
        assert!(!prediction.defaulted);

        // Nothing scripted any more: defaults
        let prediction = pipeline.predict_form_fields("Book dentist", &[]).await.unwrap();
        assert!(prediction.defaulted);
        assert_eq!(prediction.task_type, TaskType::Light);
        assert_eq!(prediction.duration, Duration::ThirtyMinutes);
    }

    #[tokio::test]
    async fn test_quick_add_sends_history_and_adds_batch() {
        let mock = Arc::new(
            MockLlmClient::new()
                .push(PARSE, MockReply::Tool(json!({ "tasks": ["Buy milk", "walk the dog"] })))
                .always(
                    PERSONALIZE,
                    MockReply::Tool(json!({ "predictedTaskType": "admin", "predictedDuration": "15-minute" })),
                )
                .always(CATEGORIZE, MockReply::Tool(json!({ "category": "Routine Operations" }))),
        );
        let predictor = Predictor::with_defaults(mock.clone());
        let store = TaskStore::spawn_with(BoardState::new("q"));
        store
            .add_task(TaskDraft::new("Pay invoices", Category::RoutineOperations, Duration::FifteenMinutes))
            .await
            .unwrap();

        let added = EnrichmentPipeline::new(&predictor)
            .quick_add("Buy milk, walk the dog", &store)
            .await
            .unwrap();

        assert_eq!(added.len(), 2);
        let snapshot = store.snapshot().await.unwrap();
        let order: Vec<_> = snapshot.tasks.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["Buy milk", "walk the dog", "Pay invoices"]);

        let personalize_prompt = mock
            .requests()
            .into_iter()
            .find(|r| r.forced_tool() == Some(PERSONALIZE))
            .unwrap();
        assert!(personalize_prompt.messages[0].content.contains("Pay invoices"));
    }

    #[tokio::test]
    async fn test_quick_add_rejects_empty_input() {
        let predictor = predictor(MockLlmClient::new());
        let store = TaskStore::spawn_with(BoardState::new("q"));
        let err = EnrichmentPipeline::new(&predictor)
            .quick_add("   ", &store)
            .await
            .unwrap_err();
        assert!(matches!(err, QuickAddError::Validation(ValidationError::EmptyDescription)));
        assert!(store.snapshot().await.unwrap().tasks.is_empty());
    }
}

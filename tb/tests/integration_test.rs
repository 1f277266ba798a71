//! Integration tests for TaskBoard
//!
//! These tests drive the public API end to end with a scripted model, plus a
//! couple of smoke tests against the `tb` binary.

use std::sync::Arc;

use assert_cmd::Command;
use predicates::prelude::*;
use proptest::prelude::*;
use serde_json::json;
use tempfile::TempDir;

use taskboard::config::PredictionConfig;
use taskboard::domain::{CATEGORY_GROUPS, Category, Duration, TaskDraft, TaskType};
use taskboard::enrich::EnrichmentPipeline;
use taskboard::grouping::{GroupingError, group_incomplete};
use taskboard::llm::{MockLlmClient, MockReply};
use taskboard::parse::{SplitSource, TaskSplitter};
use taskboard::predict::Predictor;
use taskboard::prompts::PromptLoader;
use taskboard::store::TaskStore;

const PARSE: &str = "submit_parse_multiple_tasks";
const PERSONALIZE: &str = "submit_personalize_task_predictions";
const CATEGORIZE: &str = "submit_categorize_task";
const GROUP: &str = "submit_group_similar_tasks";

fn predictor(mock: Arc<MockLlmClient>) -> Predictor {
    Predictor::with_defaults(mock)
}

// =============================================================================
// Quick-add Tests
// =============================================================================

#[tokio::test]
async fn test_quick_add_two_lines_end_to_end() {
    let mock = Arc::new(
        MockLlmClient::new()
            .push(
                PARSE,
                MockReply::Tool(json!({ "tasks": ["Reply to client email", "Update project timeline"] })),
            )
            .always(
                PERSONALIZE,
                MockReply::Tool(json!({ "predictedTaskType": "light", "predictedDuration": "15-minute" })),
            )
            .push(CATEGORIZE, MockReply::Tool(json!({ "category": "Communication" })))
            .push(CATEGORIZE, MockReply::Tool(json!({ "category": "Organizing & Planning" }))),
    );
    let predictor = predictor(mock.clone());
    let store = TaskStore::spawn();

    let existing = store
        .add_task(TaskDraft::new("Old task", Category::RoutineOperations, Duration::OneHour))
        .await
        .expect("add existing task");

    let added = EnrichmentPipeline::new(&predictor)
        .quick_add("Reply to client email\nUpdate project timeline", &store)
        .await
        .expect("quick add");

    assert_eq!(added.len(), 2);
    for task in &added {
        assert!(!task.is_completed);
        assert!(task.is_consistent(), "inconsistent task: {:?}", task);
    }

    let snapshot = store.snapshot().await.expect("snapshot");
    let descriptions: Vec<&str> = snapshot.tasks.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(
        descriptions,
        vec!["Reply to client email", "Update project timeline", "Old task"]
    );
    assert_eq!(snapshot.tasks[2].id, existing.id);
    assert_eq!(mock.calls_for(PARSE), 1);

    store.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_quick_add_into_empty_board() {
    let mock = Arc::new(
        MockLlmClient::new()
            .push(
                PARSE,
                MockReply::Tool(json!({ "tasks": ["Reply to client email", "Update project timeline"] })),
            )
            .always(
                PERSONALIZE,
                MockReply::Tool(json!({ "predictedTaskType": "light", "predictedDuration": "15-minute" })),
            )
            .always(CATEGORIZE, MockReply::Tool(json!({ "category": "Communication" }))),
    );
    let predictor = predictor(mock.clone());
    let store = TaskStore::spawn();
    assert!(store.history().await.expect("history").is_empty());

    EnrichmentPipeline::new(&predictor)
        .quick_add("Reply to client email\nUpdate project timeline", &store)
        .await
        .expect("quick add");

    let snapshot = store.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.tasks.len(), 2);
    let descriptions: Vec<&str> = snapshot.tasks.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Reply to client email", "Update project timeline"]);
    for task in &snapshot.tasks {
        assert!(!task.is_completed);
        assert_eq!(task.category, Category::Communication);
        assert_eq!(task.task_type, TaskType::Light);
        assert_eq!(task.duration, Duration::FifteenMinutes);
    }
    assert_ne!(snapshot.tasks[0].id, snapshot.tasks[1].id);
    assert_eq!(mock.calls_for(PARSE), 1);
    assert_eq!(mock.calls_for(CATEGORIZE), 2);

    store.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_quick_add_never_loses_text_when_model_is_down() {
    let mock = Arc::new(MockLlmClient::new().always(PARSE, MockReply::Fail("down".to_string())));
    let predictor = predictor(mock);
    let store = TaskStore::spawn();

    let added = EnrichmentPipeline::new(&predictor)
        .quick_add("Buy milk\n\n   Call the bank  \n", &store)
        .await
        .expect("quick add");

    let descriptions: Vec<&str> = added.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Buy milk", "Call the bank"]);
    for task in &added {
        assert_eq!(task.category, Category::Communication);
        assert_eq!(task.task_type, TaskType::Light);
        assert_eq!(task.duration, Duration::ThirtyMinutes);
    }
}

#[tokio::test]
async fn test_deadline_expiry_falls_back() {
    let mock = Arc::new(
        MockLlmClient::new()
            .always(PARSE, MockReply::Hang)
            .always(PERSONALIZE, MockReply::Hang)
            .always(CATEGORIZE, MockReply::Hang),
    );
    let config = PredictionConfig {
        deadline_ms: 50,
        ..PredictionConfig::default()
    };
    let predictor = Predictor::new(mock, PromptLoader::embedded_only(), config);

    let outcome = TaskSplitter::new(&predictor)
        .split("Write report\nFile expenses")
        .await
        .expect("split");
    assert_eq!(outcome.source, SplitSource::LineFallback);
    assert_eq!(outcome.tasks, vec!["Write report", "File expenses"]);

    let store = TaskStore::spawn();
    let added = EnrichmentPipeline::new(&predictor)
        .quick_add("Write report", &store)
        .await
        .expect("quick add");
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].category, Category::Communication);
}

#[tokio::test]
async fn test_quick_add_rejects_blank_text() {
    let mock = Arc::new(MockLlmClient::new());
    let predictor = predictor(mock.clone());
    let store = TaskStore::spawn();

    assert!(EnrichmentPipeline::new(&predictor).quick_add("   \n ", &store).await.is_err());
    assert_eq!(mock.call_count(), 0);
    assert!(store.snapshot().await.expect("snapshot").tasks.is_empty());
}

// =============================================================================
// Grouping Tests
// =============================================================================

#[tokio::test]
async fn test_grouping_with_no_tasks_makes_no_call() {
    let mock = Arc::new(MockLlmClient::new());
    let predictor = predictor(mock.clone());
    let store = TaskStore::spawn();

    let err = group_incomplete(&store, &predictor).await.unwrap_err();
    assert!(matches!(err, GroupingError::NothingToGroup));
    assert_eq!(err.to_string(), "You have no tasks to group.");
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_grouping_covers_every_incomplete_task() {
    let store = TaskStore::spawn();
    let a = store
        .add_task(TaskDraft::new("Reply to Sam", Category::Communication, Duration::ThirtyMinutes))
        .await
        .expect("add a");
    let b = store
        .add_task(TaskDraft::new("Draft the design", Category::BuildingDesigning, Duration::OneHour))
        .await
        .expect("add b");
    let done = store
        .add_task(TaskDraft::new("Pay rent", Category::RoutineOperations, Duration::FifteenMinutes))
        .await
        .expect("add done");
    store.set_completed(done.id.clone(), true).await.expect("complete");

    let mock = Arc::new(MockLlmClient::new().push(
        GROUP,
        MockReply::Tool(json!({
            "groupedTasks": [
                { "groupName": "Inbox", "taskIds": [a.id.as_str()], "totalDuration": 30 },
                { "groupName": "Design", "taskIds": [b.id.as_str()], "totalDuration": 60 }
            ]
        })),
    ));
    let predictor = predictor(mock.clone());

    let report = group_incomplete(&store, &predictor).await.expect("group");
    assert!(report.violations.is_empty(), "violations: {:?}", report.violations);
    assert_eq!(report.resolved.len(), 2);
    assert_eq!(report.resolved[0].tasks, vec![a]);
    assert_eq!(report.resolved[1].tasks, vec![b]);

    // Completed tasks are not offered to the model
    let request = &mock.requests()[0];
    assert!(!request.messages[0].content.contains("Pay rent"));
    assert!(!request.system_prompt.contains("Pay rent"));
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_enriched_tasks_are_consistent(
        category_idx in 0usize..CATEGORY_GROUPS.len(),
        type_idx in 0usize..3,
        duration_idx in 0usize..3,
    ) {
        let (category, group) = CATEGORY_GROUPS[category_idx];
        let predicted_type = TaskType::ALL[type_idx];
        let duration = Duration::ALL[duration_idx];

        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let draft = rt.block_on(async {
            let mock = Arc::new(
                MockLlmClient::new()
                    .push(
                        PERSONALIZE,
                        MockReply::Tool(json!({
                            "predictedTaskType": predicted_type.as_str(),
                            "predictedDuration": duration.as_str(),
                        })),
                    )
                    .push(CATEGORIZE, MockReply::Tool(json!({ "category": category.label() }))),
            );
            let predictor = Predictor::with_defaults(mock);
            EnrichmentPipeline::new(&predictor).enrich("Some task", &[]).await
        }).unwrap();

        prop_assert!(draft.is_consistent());
        prop_assert_eq!(draft.category, category);
        prop_assert_eq!(draft.task_type, group);
        prop_assert_eq!(draft.duration, duration);
    }
}

// =============================================================================
// Binary Smoke Tests
// =============================================================================

fn tb(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tb").expect("tb binary");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"));
    cmd
}

#[test]
fn test_binary_help() {
    let home = TempDir::new().expect("Failed to create temp dir");
    tb(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("categorize"))
        .stdout(predicate::str::contains("categories"));
}

#[test]
fn test_binary_categories_lists_labels() {
    let home = TempDir::new().expect("Failed to create temp dir");
    tb(&home)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strategy & Problem-Solving"))
        .stdout(predicate::str::contains("Follow-Ups & Coordination"))
        .stdout(predicate::str::contains("File & Tool Maintenance"));
}

#[test]
fn test_binary_predict_without_key_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(
        home.path().join(".taskboard.yml"),
        "llm:\n  api-key-env: TASKBOARD_SMOKE_KEY_THAT_IS_NEVER_SET\n",
    )
    .expect("write config");
    tb(&home)
        .args(["classify", "Write the report"])
        .env_remove("TASKBOARD_SMOKE_KEY_THAT_IS_NEVER_SET")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TASKBOARD_SMOKE_KEY_THAT_IS_NEVER_SET"));
}

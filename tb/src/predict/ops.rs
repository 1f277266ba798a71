//! The structured prediction operations
//!
//! Each operation is a narrow contract: an input shape rendered into its own
//! instruction template, and an output shape the reply must satisfy. Field
//! names on both sides are the camelCase wire names the templates and the
//! model see.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::{Category, Duration, HistoryEntry, TaskGroup, TaskId, TaskType};

/// One structured completion contract
pub trait Prediction {
    /// Operation name, also used for the forced tool `submit_<NAME>`
    const NAME: &'static str;

    /// Instruction template name (see `prompts/`)
    const TEMPLATE: &'static str;

    /// Tool description shown to the model
    const DESCRIPTION: &'static str;

    type Input: Serialize + Send + Sync;
    type Output: DeserializeOwned + Send;

    /// JSON schema of the output shape
    fn output_schema() -> Value;

    /// Shape rules serde cannot express; may normalize the value
    fn validate(output: Self::Output) -> Result<Self::Output, String> {
        Ok(output)
    }

    fn tool_name() -> String {
        format!("submit_{}", Self::NAME)
    }
}

fn enum_schema<'a>(values: impl IntoIterator<Item = &'a str>, description: &str) -> Value {
    json!({
        "type": "string",
        "enum": values.into_iter().collect::<Vec<_>>(),
        "description": description,
    })
}

fn category_schema() -> Value {
    enum_schema(Category::all().map(|c| c.label()), "The category of the task")
}

fn task_type_schema(description: &str) -> Value {
    enum_schema(TaskType::ALL.iter().map(|t| t.as_str()), description)
}

fn duration_schema(description: &str) -> Value {
    enum_schema(Duration::ALL.iter().map(|d| d.as_str()), description)
}

fn require_text(field: &str, value: String) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("`{}` must not be empty", field));
    }
    Ok(trimmed.to_string())
}

// categorize

pub struct CategorizeTask;

#[derive(Debug, Clone, Serialize)]
pub struct CategorizeInput {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategorizeOutput {
    pub category: Category,
}

impl Prediction for CategorizeTask {
    const NAME: &'static str = "categorize_task";
    const TEMPLATE: &'static str = "categorize";
    const DESCRIPTION: &'static str = "Submit the single best category for the task.";

    type Input = CategorizeInput;
    type Output = CategorizeOutput;

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": { "category": category_schema() },
            "required": ["category"]
        })
    }
}

// classify

pub struct ClassifyTaskType;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyInput {
    pub task_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyOutput {
    pub task_type: TaskType,
    pub reasoning: String,
}

impl Prediction for ClassifyTaskType {
    const NAME: &'static str = "classify_task_type";
    const TEMPLATE: &'static str = "classify";
    const DESCRIPTION: &'static str = "Submit the task type and the reasoning behind it.";

    type Input = ClassifyInput;
    type Output = ClassifyOutput;

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "taskType": task_type_schema("The classified type of the task (deep, light, or admin)"),
                "reasoning": {
                    "type": "string",
                    "description": "Why this type was chosen, naming the details used or ignored"
                }
            },
            "required": ["taskType", "reasoning"]
        })
    }

    fn validate(output: ClassifyOutput) -> Result<ClassifyOutput, String> {
        Ok(ClassifyOutput {
            reasoning: require_text("reasoning", output.reasoning)?,
            ..output
        })
    }
}

// estimate

pub struct EstimateTaskDuration;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateInput {
    pub task_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateOutput {
    pub estimated_duration: Duration,
}

impl Prediction for EstimateTaskDuration {
    const NAME: &'static str = "estimate_task_duration";
    const TEMPLATE: &'static str = "estimate";
    const DESCRIPTION: &'static str = "Submit the estimated duration block for the task.";

    type Input = EstimateInput;
    type Output = EstimateOutput;

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "estimatedDuration": duration_schema("The duration block: 15-minute, 30-minute, or 1-hour")
            },
            "required": ["estimatedDuration"]
        })
    }
}

// decompose

pub struct DecomposeLargeTask;

#[derive(Debug, Clone, Serialize)]
pub struct DecomposeInput {
    pub task: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecomposeOutput {
    pub sub_tasks: Vec<String>,
}

impl Prediction for DecomposeLargeTask {
    const NAME: &'static str = "decompose_large_task";
    const TEMPLATE: &'static str = "decompose";
    const DESCRIPTION: &'static str = "Submit the ordered list of sub-tasks.";

    type Input = DecomposeInput;
    type Output = DecomposeOutput;

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "subTasks": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Sub-tasks in the order they should be done"
                }
            },
            "required": ["subTasks"]
        })
    }

    fn validate(output: DecomposeOutput) -> Result<DecomposeOutput, String> {
        if output.sub_tasks.is_empty() {
            return Err("`subTasks` must contain at least one entry".to_string());
        }
        let sub_tasks = output
            .sub_tasks
            .into_iter()
            .map(|s| require_text("subTasks[]", s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DecomposeOutput { sub_tasks })
    }
}

// personalize

pub struct PersonalizeTaskPredictions;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizeInput {
    pub historical_data: Vec<HistoryEntry>,
    pub new_task_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizeOutput {
    pub predicted_task_type: TaskType,
    pub predicted_duration: Duration,
}

impl Prediction for PersonalizeTaskPredictions {
    const NAME: &'static str = "personalize_task_predictions";
    const TEMPLATE: &'static str = "personalize";
    const DESCRIPTION: &'static str = "Submit the predicted type and duration of the new task.";

    type Input = PersonalizeInput;
    type Output = PersonalizeOutput;

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "predictedTaskType": task_type_schema("Predicted task type"),
                "predictedDuration": duration_schema("Predicted task duration")
            },
            "required": ["predictedTaskType", "predictedDuration"]
        })
    }
}

// group

pub struct GroupSimilarTasks;

/// A task as the grouping prompt sees it: no category, no completion flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTaskInput {
    pub id: TaskId,
    pub description: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupInput {
    pub tasks: Vec<GroupTaskInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOutput {
    pub grouped_tasks: Vec<TaskGroup>,
}

impl Prediction for GroupSimilarTasks {
    const NAME: &'static str = "group_similar_tasks";
    const TEMPLATE: &'static str = "group";
    const DESCRIPTION: &'static str = "Submit the task groups. Every task id belongs to exactly one group.";

    type Input = GroupInput;
    type Output = GroupOutput;

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "groupedTasks": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "groupName": {
                                "type": "string",
                                "description": "A descriptive name, e.g. \"Communication Block\""
                            },
                            "taskIds": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "IDs of the tasks in this group"
                            },
                            "totalDuration": {
                                "type": "integer",
                                "description": "Total duration of the group's tasks in minutes"
                            }
                        },
                        "required": ["groupName", "taskIds", "totalDuration"]
                    }
                }
            },
            "required": ["groupedTasks"]
        })
    }

    fn validate(output: GroupOutput) -> Result<GroupOutput, String> {
        let grouped_tasks = output
            .grouped_tasks
            .into_iter()
            .map(|group| {
                Ok(TaskGroup {
                    group_name: require_text("groupName", group.group_name)?,
                    ..group
                })
            })
            .collect::<Result<Vec<_>, String>>()?;
        Ok(GroupOutput { grouped_tasks })
    }
}

// parse

pub struct ParseMultipleTasks;

#[derive(Debug, Clone, Serialize)]
pub struct ParseInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParseOutput {
    pub tasks: Vec<String>,
}

impl Prediction for ParseMultipleTasks {
    const NAME: &'static str = "parse_multiple_tasks";
    const TEMPLATE: &'static str = "parse";
    const DESCRIPTION: &'static str = "Submit the individual task descriptions in input order.";

    type Input = ParseInput;
    type Output = ParseOutput;

    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "tasks": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "An array of individual task descriptions"
                }
            },
            "required": ["tasks"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names() {
        assert_eq!(CategorizeTask::tool_name(), "submit_categorize_task");
        assert_eq!(GroupSimilarTasks::tool_name(), "submit_group_similar_tasks");
        assert_eq!(ParseMultipleTasks::tool_name(), "submit_parse_multiple_tasks");
    }

    #[test]
    fn test_category_schema_lists_all_twelve_labels() {
        let schema = CategorizeTask::output_schema();
        let labels = schema["properties"]["category"]["enum"].as_array().unwrap();
        assert_eq!(labels.len(), 12);
        assert!(labels.contains(&json!("Follow-Ups & Coordination")));
    }

    #[test]
    fn test_duration_schema_is_closed() {
        let schema = PersonalizeTaskPredictions::output_schema();
        assert_eq!(
            schema["properties"]["predictedDuration"]["enum"],
            json!(["15-minute", "30-minute", "1-hour"])
        );
        assert_eq!(
            schema["properties"]["predictedTaskType"]["enum"],
            json!(["deep", "light", "admin"])
        );
    }

    #[test]
    fn test_classify_requires_reasoning() {
        let empty = ClassifyOutput {
            task_type: TaskType::Deep,
            reasoning: "  ".to_string(),
        };
        assert!(ClassifyTaskType::validate(empty).is_err());

        let ok = ClassifyOutput {
            task_type: TaskType::Deep,
            reasoning: " needs focus ".to_string(),
        };
        assert_eq!(ClassifyTaskType::validate(ok).unwrap().reasoning, "needs focus");
    }

    #[test]
    fn test_decompose_rules() {
        let none = DecomposeOutput { sub_tasks: vec![] };
        assert!(DecomposeLargeTask::validate(none).is_err());

        let blank = DecomposeOutput {
            sub_tasks: vec!["Outline".to_string(), "".to_string()],
        };
        assert!(DecomposeLargeTask::validate(blank).is_err());

        let ok = DecomposeOutput {
            sub_tasks: vec![" Block 1: Outline ".to_string(), "Block 2: Draft".to_string()],
        };
        assert_eq!(
            DecomposeLargeTask::validate(ok).unwrap().sub_tasks,
            vec!["Block 1: Outline", "Block 2: Draft"]
        );
    }

    #[test]
    fn test_group_requires_names() {
        let output: GroupOutput = serde_json::from_value(json!({
            "groupedTasks": [{ "groupName": "", "taskIds": ["a"], "totalDuration": 30 }]
        }))
        .unwrap();
        assert!(GroupSimilarTasks::validate(output).is_err());
    }

    #[test]
    fn test_outputs_reject_values_outside_enums() {
        assert!(serde_json::from_value::<CategorizeOutput>(json!({ "category": "Personal" })).is_err());
        assert!(serde_json::from_value::<EstimateOutput>(json!({ "estimatedDuration": "2-hour" })).is_err());
        assert!(
            serde_json::from_value::<PersonalizeOutput>(json!({
                "predictedTaskType": "medium",
                "predictedDuration": "30-minute"
            }))
            .is_err()
        );
    }

    #[test]
    fn test_inputs_use_wire_names() {
        let input = PersonalizeInput {
            historical_data: vec![],
            new_task_description: "Pay rent".to_string(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json["historicalData"].is_array());
        assert_eq!(json["newTaskDescription"], "Pay rent");

        let input = GroupInput {
            tasks: vec![GroupTaskInput {
                id: TaskId::from("a"),
                description: "Email Bob".to_string(),
                duration: Duration::FifteenMinutes,
            }],
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["tasks"][0]["duration"], "15-minute");
    }
}

//! Category, task type and duration enumerations
//!
//! These three enumerations are a wire contract with the model: the exact
//! label strings appear in the instruction templates and in the output
//! schemas, and replies are validated against them.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cognitive-effort group a category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Deep,
    Light,
    Admin,
}

impl TaskType {
    /// All task types in board column order
    pub const ALL: [TaskType; 3] = [TaskType::Deep, TaskType::Light, TaskType::Admin];

    /// Wire label (`deep`, `light`, `admin`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Deep => "deep",
            TaskType::Light => "light",
            TaskType::Admin => "admin",
        }
    }

    /// Column heading used by the board views
    pub fn title(&self) -> &'static str {
        match self {
            TaskType::Deep => "Deep Work",
            TaskType::Light => "Light Work",
            TaskType::Admin => "Admin Work",
        }
    }

    /// Categories that belong to this group, in table order
    pub fn categories(&self) -> Vec<Category> {
        CATEGORY_GROUPS
            .iter()
            .filter(|(_, group)| group == self)
            .map(|(category, _)| *category)
            .collect()
    }

    /// Parse a wire label
    pub fn parse(s: &str) -> Option<Self> {
        debug!(%s, "TaskType::parse: called");
        TaskType::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed descriptive label a task is tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Strategy & Problem-Solving")]
    StrategyProblemSolving,
    #[serde(rename = "Creative Production")]
    CreativeProduction,
    #[serde(rename = "Research & Learning")]
    ResearchLearning,
    #[serde(rename = "Building & Designing")]
    BuildingDesigning,
    #[serde(rename = "Communication")]
    Communication,
    #[serde(rename = "Review & Feedback")]
    ReviewFeedback,
    #[serde(rename = "Organizing & Planning")]
    OrganizingPlanning,
    #[serde(rename = "Follow-Ups & Coordination")]
    FollowUpsCoordination,
    #[serde(rename = "Documentation & Data Entry")]
    DocumentationDataEntry,
    #[serde(rename = "Scheduling & Calendar")]
    SchedulingCalendar,
    #[serde(rename = "File & Tool Maintenance")]
    FileToolMaintenance,
    #[serde(rename = "Routine Operations")]
    RoutineOperations,
}

/// Partition table in label order, derived from [`Category::group`]
pub const CATEGORY_GROUPS: [(Category, TaskType); 12] = {
    let mut table = [(Category::DEFAULT, TaskType::Light); 12];
    let mut i = 0;
    while i < Category::ALL.len() {
        table[i] = (Category::ALL[i], Category::ALL[i].group());
        i += 1;
    }
    table
};

impl Category {
    /// Every category, grouped deep, light, admin
    pub const ALL: [Category; 12] = [
        Category::StrategyProblemSolving,
        Category::CreativeProduction,
        Category::ResearchLearning,
        Category::BuildingDesigning,
        Category::Communication,
        Category::ReviewFeedback,
        Category::OrganizingPlanning,
        Category::FollowUpsCoordination,
        Category::DocumentationDataEntry,
        Category::SchedulingCalendar,
        Category::FileToolMaintenance,
        Category::RoutineOperations,
    ];

    /// Bucket used when enrichment fails
    pub const DEFAULT: Category = Category::Communication;

    pub fn all() -> impl Iterator<Item = Category> {
        Category::ALL.into_iter()
    }

    /// The group this category belongs to
    pub const fn group(&self) -> TaskType {
        match self {
            Category::StrategyProblemSolving
            | Category::CreativeProduction
            | Category::ResearchLearning
            | Category::BuildingDesigning => TaskType::Deep,
            Category::Communication
            | Category::ReviewFeedback
            | Category::OrganizingPlanning
            | Category::FollowUpsCoordination => TaskType::Light,
            Category::DocumentationDataEntry
            | Category::SchedulingCalendar
            | Category::FileToolMaintenance
            | Category::RoutineOperations => TaskType::Admin,
        }
    }

    /// Wire label, e.g. `Strategy & Problem-Solving`
    pub fn label(&self) -> &'static str {
        match self {
            Category::StrategyProblemSolving => "Strategy & Problem-Solving",
            Category::CreativeProduction => "Creative Production",
            Category::ResearchLearning => "Research & Learning",
            Category::BuildingDesigning => "Building & Designing",
            Category::Communication => "Communication",
            Category::ReviewFeedback => "Review & Feedback",
            Category::OrganizingPlanning => "Organizing & Planning",
            Category::FollowUpsCoordination => "Follow-Ups & Coordination",
            Category::DocumentationDataEntry => "Documentation & Data Entry",
            Category::SchedulingCalendar => "Scheduling & Calendar",
            Category::FileToolMaintenance => "File & Tool Maintenance",
            Category::RoutineOperations => "Routine Operations",
        }
    }

    /// Short guidance shown to the model next to each label
    pub fn guidance(&self) -> &'static str {
        match self {
            Category::StrategyProblemSolving => "Business strategy, analysis, financial modeling, decision frameworks",
            Category::CreativeProduction => "Writing, design, coding, music, content creation",
            Category::ResearchLearning => "Reading, studying, synthesizing knowledge, data exploration",
            Category::BuildingDesigning => "Product design, system architecture, prototyping, solution mapping",
            Category::Communication => "Emails, chat replies, drafting short updates, responding to inquiries",
            Category::ReviewFeedback => "Reviewing documents, slide decks, pull requests, proofreading",
            Category::OrganizingPlanning => "Updating task boards, making short plans, simple scheduling",
            Category::FollowUpsCoordination => "Chasing deliverables, aligning with colleagues, preparing reminders",
            Category::DocumentationDataEntry => "Logging notes, updating CRM, form filling, timesheets",
            Category::SchedulingCalendar => "Booking/rescheduling meetings, time-blocking",
            Category::FileToolMaintenance => "Uploading files, renaming, organizing folders, backups",
            Category::RoutineOperations => "Expense reports, invoice processing, compliance checklists",
        }
    }

    /// Parse a wire label (case-insensitive, surrounding whitespace ignored)
    pub fn parse(s: &str) -> Option<Self> {
        debug!(%s, "Category::parse: called");
        let needle = s.trim();
        Category::all().find(|c| c.label().eq_ignore_ascii_case(needle))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Estimated-time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Duration {
    #[serde(rename = "15-minute")]
    FifteenMinutes,
    #[serde(rename = "30-minute")]
    ThirtyMinutes,
    #[serde(rename = "1-hour")]
    OneHour,
}

impl Duration {
    /// All buckets, shortest first
    pub const ALL: [Duration; 3] = [Duration::FifteenMinutes, Duration::ThirtyMinutes, Duration::OneHour];

    /// Bucket used when enrichment fails
    pub const DEFAULT: Duration = Duration::ThirtyMinutes;

    /// Wire label (`15-minute`, `30-minute`, `1-hour`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Duration::FifteenMinutes => "15-minute",
            Duration::ThirtyMinutes => "30-minute",
            Duration::OneHour => "1-hour",
        }
    }

    /// Length of the bucket in minutes
    pub fn minutes(&self) -> u32 {
        match self {
            Duration::FifteenMinutes => 15,
            Duration::ThirtyMinutes => 30,
            Duration::OneHour => 60,
        }
    }

    /// Parse a wire label
    pub fn parse(s: &str) -> Option<Self> {
        Duration::ALL.into_iter().find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

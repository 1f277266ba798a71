//! Policy audit of grouping output
//!
//! The grouping prompt asks for blocks of at most an hour with every task in
//! exactly one block. The model's answer can satisfy the output shape and
//! still break those rules; this module lists the breaches.

use std::collections::HashMap;
use std::fmt;

use crate::domain::{Task, TaskGroup, TaskId};

/// Maximum minutes in one work block
pub const GROUP_CAPACITY_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    /// The tasks in a group add up to more than an hour
    OverCapacity { group_name: String, minutes: u32 },
    /// A task was left out of every group
    Orphaned { task_id: TaskId },
    /// A task appears in more than one group (or twice in one)
    DuplicateAssignment { task_id: TaskId, groups: Vec<String> },
    /// A group names an id that is not among the grouped tasks
    UnknownTask { group_name: String, task_id: TaskId },
    /// The reported total differs from the sum of the known tasks
    DurationMismatch {
        group_name: String,
        reported: u32,
        actual: u32,
    },
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::OverCapacity { group_name, minutes } => {
                write!(
                    f,
                    "'{}' holds {} minutes (limit {})",
                    group_name, minutes, GROUP_CAPACITY_MINUTES
                )
            }
            PolicyViolation::Orphaned { task_id } => write!(f, "task {} is in no group", task_id),
            PolicyViolation::DuplicateAssignment { task_id, groups } => {
                write!(f, "task {} is assigned more than once: {}", task_id, groups.join(", "))
            }
            PolicyViolation::UnknownTask { group_name, task_id } => {
                write!(f, "'{}' names unknown task {}", group_name, task_id)
            }
            PolicyViolation::DurationMismatch {
                group_name,
                reported,
                actual,
            } => write!(
                f,
                "'{}' reports {} minutes but its tasks add up to {}",
                group_name, reported, actual
            ),
        }
    }
}

/// Check `groups` against the tasks that were sent for grouping
///
/// Capacity is checked against the larger of the reported and computed
/// totals, so a group that under-reports its size is still flagged.
pub fn audit_groups(groups: &[TaskGroup], tasks: &[Task]) -> Vec<PolicyViolation> {
    let minutes: HashMap<&TaskId, u32> = tasks.iter().map(|t| (&t.id, t.duration.minutes())).collect();
    let mut assignments: HashMap<&TaskId, Vec<String>> = HashMap::new();
    let mut violations = Vec::new();

    for group in groups {
        let mut actual: u32 = 0;
        for id in &group.task_ids {
            match minutes.get(id) {
                Some(m) => {
                    actual += *m;
                    assignments.entry(id).or_default().push(group.group_name.clone());
                }
                None => violations.push(PolicyViolation::UnknownTask {
                    group_name: group.group_name.clone(),
                    task_id: id.clone(),
                }),
            }
        }

        if group.total_duration != actual {
            violations.push(PolicyViolation::DurationMismatch {
                group_name: group.group_name.clone(),
                reported: group.total_duration,
                actual,
            });
        }

        let size = actual.max(group.total_duration);
        if size > GROUP_CAPACITY_MINUTES {
            violations.push(PolicyViolation::OverCapacity {
                group_name: group.group_name.clone(),
                minutes: size,
            });
        }
    }

    for task in tasks {
        match assignments.get(&task.id) {
            None => violations.push(PolicyViolation::Orphaned {
                task_id: task.id.clone(),
            }),
            Some(groups) if groups.len() > 1 => violations.push(PolicyViolation::DuplicateAssignment {
                task_id: task.id.clone(),
                groups: groups.clone(),
            }),
            Some(_) => {}
        }
    }

    violations
}

//! Read-only views over a board snapshot

use crate::domain::{Category, HistoryEntry, Task, TaskId, TaskType};

use super::reducer::BoardState;

impl BoardState {
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Incomplete tasks of one type, board order
    pub fn todo_by_type(&self, task_type: TaskType) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| !t.is_completed && t.task_type == task_type)
            .collect()
    }

    pub fn completed(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_completed).collect()
    }

    pub fn incomplete(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.is_completed).collect()
    }

    /// Incomplete tasks in one category
    pub fn by_category(&self, category: Category) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| !t.is_completed && t.category == category)
            .collect()
    }

    /// Every task as personalization history
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.tasks.iter().map(Task::history_entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Duration, TaskDraft};
    use crate::store::{TaskCommand, reduce};

    fn board() -> BoardState {
        let state = reduce(
            BoardState::new("v"),
            TaskCommand::AddTasks(vec![
                TaskDraft::new("Email Ana", Category::Communication, Duration::FifteenMinutes),
                TaskDraft::new("Write essay", Category::CreativeProduction, Duration::OneHour),
                TaskDraft::new("Pay invoice", Category::RoutineOperations, Duration::FifteenMinutes),
                TaskDraft::new("Reply to Bo", Category::Communication, Duration::FifteenMinutes),
            ]),
        );
        let done = state.tasks[3].id.clone();
        reduce(state, TaskCommand::SetCompleted { id: done, completed: true })
    }

    #[test]
    fn test_views_partition_the_board() {
        let state = board();

        assert_eq!(state.todo_by_type(TaskType::Light).len(), 1);
        assert_eq!(state.todo_by_type(TaskType::Deep).len(), 1);
        assert_eq!(state.todo_by_type(TaskType::Admin).len(), 1);
        assert_eq!(state.completed().len(), 1);
        assert_eq!(state.incomplete().len(), 3);
        assert_eq!(state.completed()[0].description, "Reply to Bo");
        assert_eq!(state.by_category(Category::Communication).len(), 1);
    }

    #[test]
    fn test_get_and_history() {
        let state = board();
        let id = state.tasks[1].id.clone();
        assert_eq!(state.get(&id).unwrap().description, "Write essay");
        assert!(state.get(&TaskId::from("missing")).is_none());

        let history = state.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[1].task_type, TaskType::Deep);
    }
}

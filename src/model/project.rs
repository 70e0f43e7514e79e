use serde::Deserialize;

use super::task::TaskInput;

/// Raw project record as supplied by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskInput>,
}

/// A named group of tasks sharing a label column and a lateness indicator.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Ids of member tasks, in input order.
    pub task_ids: Vec<String>,
    /// First and last display row occupied by this project's tasks.
    pub first_row: usize,
    pub last_row: usize,
    /// Days behind schedule, derived by the projection pass.
    pub lateness_days: i64,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            task_ids: Vec::new(),
            first_row: 0,
            last_row: 0,
            lateness_days: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.last_row - self.first_row + 1
    }
}

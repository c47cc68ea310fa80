use serde::{Deserialize, Serialize};

/// The four fixed levels of the task tree, top to bottom.
/// The depth is hardcoded: a node's children sit exactly one level below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TaskLevel {
    Goal,
    Large,
    Medium,
    Small,
}

impl TaskLevel {
    /// The only level allowed for children of a node at this level.
    pub fn child_level(self) -> Option<TaskLevel> {
        match self {
            TaskLevel::Goal => Some(TaskLevel::Large),
            TaskLevel::Large => Some(TaskLevel::Medium),
            TaskLevel::Medium => Some(TaskLevel::Small),
            TaskLevel::Small => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub level: TaskLevel,
    pub parent_id: Option<String>,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: TaskStatus,
    pub progress: i64,
    pub memo: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub user_id: String,
    pub level: TaskLevel,
    pub parent_id: Option<String>,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub memo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub memo: Option<String>,
}

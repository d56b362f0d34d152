use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
///
/// No transition graph is enforced: any status may replace any other.
/// The lowercase `pending`/`completed` spellings are accepted on input.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Initial status of every new task.
    #[default]
    #[serde(alias = "pending")]
    Pending,
    #[serde(rename = "TO DO")]
    #[sqlx(rename = "TO DO")]
    ToDo,
    #[serde(rename = "BLOCKED")]
    #[sqlx(rename = "BLOCKED")]
    Blocked,
    #[serde(rename = "IN PROGRESS")]
    #[sqlx(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "COMPLETED", alias = "completed")]
    #[sqlx(rename = "COMPLETED")]
    Completed,
}

/// Body of `POST /api/tasks`.
///
/// There is no owner field: the owner always comes from the
/// authenticated identity, and unknown keys such as `userId` are ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Calendar date, `YYYY-MM-DD`.
    pub due_date: NaiveDate,

    pub priority: TaskPriority,
}

/// Body of `PUT /api/tasks/{id}`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: TaskStatus,
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Owner, fixed at creation.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task ready to be persisted. The store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub user_id: Uuid,
}

impl NewTask {
    /// Builds a pending task owned by `owner`.
    pub fn new(input: TaskInput, owner: Uuid) -> Self {
        Self {
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            priority: input.priority,
            status: TaskStatus::default(),
            user_id: owner,
        }
    }
}

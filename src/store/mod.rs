//! Credential store ports and their implementations.
//!
//! Handlers only talk to the `UserStore` and `TaskStore` traits. Every method
//! is a single store operation; atomicity beyond one record is not provided.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewTask, NewUser, Task, TaskStatus, User};

pub use memory::{MemoryTaskStore, MemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique field is already taken.
    Conflict(String),
    /// The backend failed to serve the request.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Conflict(msg) => write!(f, "conflict: {}", msg),
            StoreError::Backend(msg) => write!(f, "store failure: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact, case-sensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Persists a new user. Fails with `StoreError::Conflict` when the email
    /// is already registered; an existing record is never overwritten.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Task>, StoreError>;

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError>;

    /// Sets the status of task `id`. When `owner` is given, a task owned by
    /// someone else is treated as absent. Returns the updated task.
    async fn update_status(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError>;

    /// Removes task `id` under the same owner rule as `update_status`.
    /// Returns the removed task.
    async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Task>, StoreError>;
}

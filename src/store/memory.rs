//! In-memory stores for local runs and tests. Data is lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{NewTask, NewUser, Task, TaskStatus, User};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        // The uniqueness check and the push happen under one write lock.
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("User already exists".into()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// Tasks kept in insertion order.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks across all owners.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    fn position(tasks: &[Task], id: Uuid, owner: Option<Uuid>) -> Option<usize> {
        tasks
            .iter()
            .position(|t| t.id == id && owner.map_or(true, |o| t.user_id == o))
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().filter(|t| t.user_id == owner).cloned().collect())
    }

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            priority: task.priority,
            status: task.status,
            user_id: task.user_id,
            created_at: now,
            updated_at: now,
        };
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn update_status(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        Ok(Self::position(&tasks, id, owner).map(|index| {
            let task = &mut tasks[index];
            task.status = status;
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Task>, StoreError> {
        let mut tasks = self.tasks.write().await;
        Ok(Self::position(&tasks, id, owner).map(|index| tasks.remove(index)))
    }
}

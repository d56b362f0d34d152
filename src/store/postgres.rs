//! Postgres-backed stores.
//!
//! Users and tasks each carry their own migration set so they can live in
//! separate databases. Both sets share one `_sqlx_migrations` table when
//! pointed at the same database, hence the distinct version numbers and
//! `ignore_missing`.

use async_trait::async_trait;
use sqlx::migrate::MigrateError;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{NewTask, NewUser, Task, TaskStatus, User};

const USER_COLUMNS: &str = "id, email, password_hash, name, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, title, description, due_date, priority, status, user_id, created_at, updated_at";

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match &error {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict("Record already exists".into())
            }
            _ => StoreError::Backend(error.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `users` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        let mut migrator = sqlx::migrate!("./migrations/users");
        migrator.set_ignore_missing(true);
        migrator.run(&self.pool).await
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, email, password_hash, name) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::Conflict(_) => StoreError::Conflict("User already exists".into()),
            other => other,
        })?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the task enum types and the `tasks` table if needed.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        let mut migrator = sqlx::migrate!("./migrations/tasks");
        migrator.set_ignore_missing(true);
        migrator.run(&self.pool).await
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY seq",
            TASK_COLUMNS
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, due_date, priority, status, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(task.title)
        .bind(task.description)
        .bind(task.due_date)
        .bind(task.priority)
        .bind(task.status)
        .bind(task.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_status(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        status: TaskStatus,
    ) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET status = $1, updated_at = now() \
             WHERE id = $2 AND ($3::uuid IS NULL OR user_id = $3) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "DELETE FROM tasks WHERE id = $1 AND ($2::uuid IS NULL OR user_id = $2) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }
}

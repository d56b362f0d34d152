//! Service lifecycles.
//!
//! Each service is built once at startup from a `Config`, hands cheap clones
//! of itself to every actix worker through `configure`, and releases its
//! connection pool in `shutdown`.

use std::fmt;
use std::sync::Arc;

use actix_web::web;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::auth::{AuthMiddleware, PasswordHasher, TokenService};
use crate::config::{Config, ConfigError, OwnershipPolicy, StorageBackend};
use crate::routes;
use crate::store::{MemoryTaskStore, MemoryUserStore, PgTaskStore, PgUserStore, TaskStore, UserStore};

#[derive(Debug)]
pub enum StartupError {
    Config(ConfigError),
    Database(sqlx::Error),
    Migration(sqlx::migrate::MigrateError),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StartupError::Config(e) => write!(f, "configuration error: {}", e),
            StartupError::Database(e) => write!(f, "failed to connect to database: {}", e),
            StartupError::Migration(e) => write!(f, "failed to apply migrations: {}", e),
        }
    }
}

impl std::error::Error for StartupError {}

impl From<ConfigError> for StartupError {
    fn from(error: ConfigError) -> Self {
        StartupError::Config(error)
    }
}

impl From<sqlx::Error> for StartupError {
    fn from(error: sqlx::Error) -> Self {
        StartupError::Database(error)
    }
}

impl From<sqlx::migrate::MigrateError> for StartupError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        StartupError::Migration(error)
    }
}

async fn connect(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(10).connect(url).await
}

/// Registration and login.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    pool: Option<PgPool>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>, hasher: PasswordHasher) -> Self {
        Self {
            users,
            tokens,
            hasher,
            pool: None,
        }
    }

    /// Connects to the configured user store and applies its migrations.
    pub async fn start(config: &Config) -> Result<Self, StartupError> {
        let tokens = Arc::new(TokenService::new(&config.jwt));
        let hasher = PasswordHasher::new(config.bcrypt_cost);

        match &config.storage {
            StorageBackend::Postgres {
                users_database_url, ..
            } => {
                let pool = connect(users_database_url).await?;
                let store = PgUserStore::new(pool.clone());
                store.migrate().await?;
                log::info!("User store ready (postgres)");
                Ok(Self {
                    users: Arc::new(store),
                    tokens,
                    hasher,
                    pool: Some(pool),
                })
            }
            StorageBackend::Memory => {
                log::warn!("User store is in memory; data is lost on restart");
                Ok(Self::new(Arc::new(MemoryUserStore::new()), tokens, hasher))
            }
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.users.clone()))
            .app_data(web::Data::from(self.tokens.clone()))
            .app_data(web::Data::new(self.hasher))
            .app_data(routes::json_config());
        routes::user_routes(cfg);
    }

    pub async fn shutdown(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}

/// Task CRUD behind the auth gate.
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    tokens: Arc<TokenService>,
    ownership: OwnershipPolicy,
    pool: Option<PgPool>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>, tokens: Arc<TokenService>, ownership: OwnershipPolicy) -> Self {
        Self {
            tasks,
            tokens,
            ownership,
            pool: None,
        }
    }

    /// Connects to the configured task store and applies its migrations.
    pub async fn start(config: &Config) -> Result<Self, StartupError> {
        let tokens = Arc::new(TokenService::new(&config.jwt));
        let ownership = config.task_ownership;
        if ownership == OwnershipPolicy::Unscoped {
            log::warn!("Task update/delete are not restricted to the task owner (TASK_OWNERSHIP=unscoped)");
        }

        match &config.storage {
            StorageBackend::Postgres {
                tasks_database_url, ..
            } => {
                let pool = connect(tasks_database_url).await?;
                let store = PgTaskStore::new(pool.clone());
                store.migrate().await?;
                log::info!("Task store ready (postgres)");
                Ok(Self {
                    tasks: Arc::new(store),
                    tokens,
                    ownership,
                    pool: Some(pool),
                })
            }
            StorageBackend::Memory => {
                log::warn!("Task store is in memory; data is lost on restart");
                Ok(Self::new(Arc::new(MemoryTaskStore::new()), tokens, ownership))
            }
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.tasks.clone()))
            .app_data(web::Data::new(self.ownership))
            .app_data(routes::json_config())
            .app_data(routes::task_path_config());
        routes::task_routes(cfg, AuthMiddleware::new(self.tokens.clone()));
    }

    pub async fn shutdown(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}

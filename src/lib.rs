#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Shared code for the two services of the task manager: the user-service"]
#![doc = "(registration and login) and the task-service (per-user task CRUD behind"]
#![doc = "a bearer-token gate). Each binary builds its service from `Config` and"]
#![doc = "mounts it into an actix-web `App` through `configure`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::AppError;
pub use services::{StartupError, TaskService, UserService};

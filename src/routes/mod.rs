pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// JSON bodies that fail to decode are reported as `400 {"error": ...}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// A task id that is not a UUID cannot name an existing task.
pub fn task_path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::NotFound("Task not found".into()).into())
}

/// Mounts the user-service routes under `/api/users`.
pub fn user_routes(cfg: &mut web::ServiceConfig) {
    health::mount(cfg, "user-service");
    cfg.service(
        web::scope("/api/users")
            .service(users::register)
            .service(users::login),
    );
}

/// Mounts the task-service routes under `/api/tasks`, all behind `gate`.
pub fn task_routes(cfg: &mut web::ServiceConfig, gate: AuthMiddleware) {
    health::mount(cfg, "task-service");
    cfg.service(
        web::scope("/api/tasks")
            .wrap(gate)
            .service(tasks::list_tasks)
            .service(tasks::create_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}

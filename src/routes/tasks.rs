use crate::{
    auth::AuthenticatedUserId,
    config::OwnershipPolicy,
    error::AppError,
    models::{NewTask, StatusUpdate, TaskInput},
    store::TaskStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Retrieves the tasks owned by the authenticated user.
///
/// Tasks come back in creation order. There is no filtering or pagination.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects, possibly empty.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `500 Internal Server Error`: store failure.
#[get("")]
pub async fn list_tasks(
    tasks: web::Data<dyn TaskStore>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let owned = tasks.list_by_owner(user.0).await?;
    log::info!("Fetched {} tasks for user {}", owned.len(), user.0);
    Ok(HttpResponse::Ok().json(owned))
}

/// Creates a new task for the authenticated user.
///
/// The owner is always the authenticated user; an owner field in the body is
/// ignored. New tasks start as `Pending`.
///
/// ## Request Body:
/// - `title`: required, 1 to 200 characters.
/// - `description` (optional): up to 1000 characters.
/// - `dueDate`: required calendar date, `YYYY-MM-DD`.
/// - `priority`: required, one of `High`, `Medium`, `Low`.
///
/// ## Responses:
/// - `201 Created`: the stored `Task`.
/// - `400 Bad Request`: a required field is missing or invalid.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `500 Internal Server Error`: store failure.
#[post("")]
pub async fn create_task(
    tasks: web::Data<dyn TaskStore>,
    user: AuthenticatedUserId,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let input = task_data.into_inner();
    input.validate()?;

    let task = tasks.insert(NewTask::new(input, user.0)).await?;
    log::info!("User {} created task {}", user.0, task.id);

    Ok(HttpResponse::Created().json(task))
}

/// Replaces the status of a task.
///
/// Under `OwnershipPolicy::Unscoped` the task is looked up by id alone, so
/// any authenticated user may change it. Under `OwnershipPolicy::Owner` a
/// task owned by someone else is reported as not found.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: missing or unknown status.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `404 Not Found`: no matching task.
/// - `500 Internal Server Error`: store failure.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<dyn TaskStore>,
    policy: web::Data<OwnershipPolicy>,
    user: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
    update: web::Json<StatusUpdate>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    let task = tasks
        .update_status(task_id, policy.scope(user.0), update.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if task.user_id != user.0 {
        log::warn!("User {} updated task {} owned by {}", user.0, task.id, task.user_id);
    }
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its ID, under the same ownership rule as updates.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted"}`
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `404 Not Found`: no matching task.
/// - `500 Internal Server Error`: store failure.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<dyn TaskStore>,
    policy: web::Data<OwnershipPolicy>,
    user: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    let removed = tasks
        .delete(task_id, policy.scope(user.0))
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    log::info!("User {} deleted task {}", user.0, removed.id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}

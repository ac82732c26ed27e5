use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{StatusInput, Task, TaskInput},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Lists the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: `{ "tasks": [Task] }`, newest first.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `500 Internal Server Error`: `{ "error": "Failed to fetch tasks" }`.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = state
        .store
        .list_tasks(caller.id())
        .await
        .map_err(|e| e.context("Failed to fetch tasks"))?;

    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Creates a task owned by the caller.
///
/// ## Request Body:
/// `TaskInput`: `title`, `priority` (`low`/`medium`/`high`), optional `checklist`
/// and optional `dueDate` (RFC 3339 or `YYYY-MM-DD`).
///
/// ## Responses:
/// - `201 Created`: `{ "message", "task" }`.
/// - `400 Bad Request`: body is not valid JSON for `TaskInput`.
/// - `422 Unprocessable Entity`: a field fails validation.
/// - `500 Internal Server Error`: `{ "error": "Failed to create task" }`.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), caller.id());
    state
        .store
        .insert_task(&task)
        .await
        .map_err(|e| e.context("Failed to create task"))?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully",
        "task": task
    })))
}

/// Fetches one of the caller's tasks.
///
/// Tasks owned by someone else answer `404`, same as tasks that do not exist.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state
        .store
        .find_task(task_id.into_inner(), caller.id())
        .await
        .map_err(|e| e.context("Failed to fetch task details"))?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Overwrites title, priority, checklist and due date of one of the caller's tasks.
///
/// Responds with the task as it is after the update.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .store
        .update_task(task_id.into_inner(), caller.id(), &task_data)
        .await
        .map_err(|e| e.context("Failed to update task"))?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated successfully",
        "task": task
    })))
}

/// Sets the free-form `status` label of one of the caller's tasks.
#[put("/{id}/status")]
pub async fn update_task_status(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    body: web::Json<StatusInput>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let task = state
        .store
        .update_task_status(task_id.into_inner(), caller.id(), &body.status)
        .await
        .map_err(|e| e.context("Server error"))?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task status updated successfully",
        "task": task
    })))
}

/// Deletes one of the caller's tasks and returns what it held.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let deleted = state
        .store
        .delete_task(task_id.into_inner(), caller.id())
        .await
        .map_err(|e| e.context("Failed to delete task"))?
        .ok_or_else(task_not_found)?;

    log::info!("user {} deleted task {}", caller.id(), deleted.id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully",
        "deletedTask": deleted
    })))
}

//! Task CRUD and query handlers.
//!
//! Every route requires a bearer token. Handlers only translate between HTTP
//! and `TaskService`; caching happens below the service.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use tasktrack_core::task::{
    CreateTaskRequest, ListTasksQuery, Task, UpcomingTasksQuery, UpdateTaskRequest,
};

use crate::{
    auth::AuthUser,
    handlers::{error::BadRequest, AppError},
    state::AppState,
};

fn task_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, BadRequest> {
    path.map(|Path(id)| id)
        .map_err(|e| BadRequest(format!("Invalid task id: {}", e.body_text())))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, BadRequest> {
    body.map(|Json(value)| value)
        .map_err(|e| BadRequest(format!("Invalid request body: {}", e.body_text())))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, BadRequest> {
    query
        .map(|Query(value)| value)
        .map_err(|e| BadRequest(format!("Invalid query: {}", e.body_text())))
}

/// Create a task (POST /api/tasks).
pub async fn create_task(
    user: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let request = json_body(body)?;
    tracing::debug!(user_id = user.user_id, request = ?request, "Received create task request");

    let task = state.tasks.create_task(request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks with optional filters (GET /api/tasks).
pub async fn list_tasks(
    user: AuthUser,
    State(state): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> Result<Json<Vec<Task>>, AppError> {
    let query = query_params(query)?;
    tracing::debug!(user_id = user.user_id, query = ?query, "Listing tasks");

    let tasks = state.tasks.list_tasks(&query).await?;
    Ok(Json(tasks))
}

/// Pending tasks by due date (GET /api/tasks/upcoming).
pub async fn upcoming_tasks(
    _user: AuthUser,
    State(state): State<AppState>,
    query: Result<Query<UpcomingTasksQuery>, QueryRejection>,
) -> Result<Json<Vec<Task>>, AppError> {
    let query = query_params(query)?;
    let tasks = state.tasks.upcoming_tasks(query.limit).await?;
    Ok(Json(tasks))
}

/// Unfinished tasks more than a day past due (GET /api/tasks/overdue).
pub async fn overdue_tasks(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state.tasks.overdue_tasks().await?;
    Ok(Json(tasks))
}

/// Get a single task (GET /api/tasks/{id}).
pub async fn get_task(
    _user: AuthUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Task>, AppError> {
    let id = task_id(path)?;
    let task = state.tasks.get_task(id).await?;
    Ok(Json(task))
}

/// Apply a partial update (PUT /api/tasks/{id}).
pub async fn update_task(
    user: AuthUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let id = task_id(path)?;
    let request = json_body(body)?;
    tracing::debug!(user_id = user.user_id, task_id = %id, request = ?request, "Received update task request");

    let task = state.tasks.update_task(id, request).await?;
    Ok(Json(task))
}

/// Delete a task (DELETE /api/tasks/{id}).
pub async fn delete_task(
    user: AuthUser,
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = task_id(path)?;
    tracing::debug!(user_id = user.user_id, task_id = %id, "Received delete task request");

    state.tasks.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

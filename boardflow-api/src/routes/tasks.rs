/// Task endpoints
///
/// - `GET /columns/{id}/tasks` - list a column's tasks in display order
/// - `POST /columns/{id}/tasks` - append a task to a column
/// - `PUT /tasks/{id}` - update a task's fields, optionally reparenting it
/// - `DELETE /tasks/{id}` - delete a task
/// - `POST /tasks/{id}/move` - move a task to the adjacent column
///
/// Creation appends at the end of the column. A move places the task at
/// the end of the neighbouring column and renumbers the source column
/// densely from zero; moving past either edge is a 400 and leaves the
/// board untouched.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use boardflow_shared::{
    auth::middleware::AuthUser,
    models::{
        column::Column,
        task::{deserialize_explicit_null, CreateTask, Task, TaskPriority, UpdateTask},
    },
    ordering::MoveDirection,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create-task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Free-form description
    pub description: Option<String>,

    /// Due date
    pub deadline: Option<DateTime<Utc>>,

    /// Priority, defaults to low
    #[serde(default)]
    pub priority: TaskPriority,
}

/// Update-task request; omitted fields keep their current values
///
/// Description and deadline are presence-keyed: omit to keep, send an
/// explicit `null` to clear.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    /// New description; explicit `null` clears it
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub description: Option<Option<String>>,

    /// New position, overwritten verbatim
    pub position: Option<i32>,

    /// Target column, reparenting the task
    pub column_id: Option<Uuid>,

    /// New due date; explicit `null` clears it
    #[serde(default, deserialize_with = "deserialize_explicit_null")]
    pub deadline: Option<Option<DateTime<Utc>>>,

    /// New priority
    pub priority: Option<TaskPriority>,
}

/// Move-task request
#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    /// Which neighbouring column to move into
    pub direction: MoveDirection,
}

/// Lists a column's tasks in display order
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(column_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    Column::find_owned(&state.db, column_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    let tasks = Task::list_for_column(&state.db, column_id).await?;
    Ok(Json(tasks))
}

/// Appends a task to the end of a column
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(column_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    Column::find_owned(&state.db, column_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;

    let task = Task::create(
        &state.db,
        column_id,
        CreateTask {
            title: req.title,
            description: req.description,
            deadline: req.deadline,
            priority: req.priority,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Updates a task's fields
///
/// A `column_id` in the body reparents the task; the target column must
/// belong to the caller. Position and column are written verbatim with no
/// renumbering of either column.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    if let Some(column_id) = req.column_id {
        Column::find_owned(&state.db, column_id, auth.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Column not found".to_string()))?;
    }

    let task = Task::update_owned(
        &state.db,
        id,
        auth.user_id,
        UpdateTask {
            title: req.title,
            description: req.description,
            position: req.position,
            column_id: req.column_id,
            deadline: req.deadline,
            priority: req.priority,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete_owned(&state.db, id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Task deleted")))
}

/// Moves a task into the adjacent column
///
/// The task lands at the end of the neighbouring column and the source
/// column is renumbered densely from zero. Moving past the leftmost or
/// rightmost column is a 400 and changes nothing.
pub async fn move_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveTaskRequest>,
) -> ApiResult<Json<Task>> {
    let task = Task::move_adjacent(&state.db, id, auth.user_id, req.direction).await?;
    Ok(Json(task))
}

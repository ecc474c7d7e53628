use crate::notify::{self, Notifier};
use crate::resource::{self, DetailsResponse, MessageResponse, PathTokens, ResourceError};
use crate::task::{
    CompletionAction, NewTask, SortOrder, Task, TaskChanges, TaskService, completion_message,
    parse_timestamp,
};
use axum::{
    Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared state for the task routes.
#[derive(Clone)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
    pub notifier: Arc<dyn Notifier>,
}

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskJson {
    /// Unique identifier for the task
    id: i32,
    title: String,
    description: String,
    /// Whether the task carries a completion timestamp
    is_complete: bool,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            is_complete: task.is_complete(),
            title: task.title().to_string(),
            description: task.description().to_string(),
        }
    }
}

/// API response wrapping a single task.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    task: TaskJson,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            task: TaskJson::from(task),
        }
    }
}

/// Request body for POST /tasks.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskPayload {
    title: Option<String>,
    description: Option<String>,
    /// Completion timestamp; omit or send null for an incomplete task
    completed_at: Option<String>,
}

impl TryFrom<CreateTaskPayload> for NewTask {
    type Error = ResourceError;

    fn try_from(payload: CreateTaskPayload) -> Result<Self, Self::Error> {
        let completed_at = match payload.completed_at {
            Some(raw) => Some(parse_timestamp(&raw).ok_or(ResourceError::InvalidPayload)?),
            None => None,
        };
        Ok(NewTask {
            title: resource::required(payload.title)?,
            description: resource::required(payload.description)?,
            completed_at,
        })
    }
}

/// Request body for PUT /tasks/{task_id}.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskPayload {
    title: Option<String>,
    description: Option<String>,
}

impl TryFrom<UpdateTaskPayload> for TaskChanges {
    type Error = ResourceError;

    fn try_from(payload: UpdateTaskPayload) -> Result<Self, Self::Error> {
        Ok(TaskChanges {
            title: resource::required(payload.title)?,
            description: resource::required(payload.description)?,
        })
    }
}

/// Returns the first `sort` value of a task listing query.
///
/// A query string that cannot be read at all counts as no sort request.
fn requested_sort(query: Result<Query<Vec<(String, String)>>, QueryRejection>) -> Option<String> {
    let Query(pairs) = query.ok()?;
    pairs
        .into_iter()
        .find(|(key, _)| key == "sort")
        .map(|(_, value)| value)
}

/// Handler for POST /tasks - Creates a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskPayload,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Missing or malformed field", body = DetailsResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    payload: Result<Json<CreateTaskPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ResourceError> {
    let new_task = NewTask::try_from(resource::accept_json(payload)?)?;
    let service = TaskService::new(&state.db);
    let task = service.create_task(new_task).await?;
    tracing::info!("Created task {}", task.id());
    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Handler for GET /tasks - Returns all tasks.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks",
    params(
        ("sort" = Option<String>, Query, description = "`asc` or `desc` to order by title")
    ),
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = [TaskJson])
    ),
    tag = "Tasks"
)]
pub async fn get_tasks_handler(
    State(state): State<Arc<TaskState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<TaskJson>>, ResourceError> {
    let sort = requested_sort(query);
    let service = TaskService::new(&state.db);
    let tasks = service
        .get_all_tasks(SortOrder::from_query(sort.as_deref()))
        .await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for GET /tasks/{task_id} - Returns one task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks/{task_id}",
    params(("task_id" = String, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 400, description = "Identifier is not an integer", body = MessageResponse),
        (status = 404, description = "Task not found", body = MessageResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    task_id: PathTokens,
) -> Result<Json<TaskResponse>, ResourceError> {
    let service = TaskService::new(&state.db);
    let task = service.get_task(task_id.id()).await?;
    Ok(Json(TaskResponse::from(task)))
}

/// Handler for PUT /tasks/{task_id} - Replaces title and description.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/tasks/{task_id}",
    params(("task_id" = String, Path, description = "Task identifier")),
    request_body = UpdateTaskPayload,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid identifier or payload"),
        (status = 404, description = "Task not found", body = MessageResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    task_id: PathTokens,
    payload: Result<Json<UpdateTaskPayload>, JsonRejection>,
) -> Result<Json<TaskResponse>, ResourceError> {
    let service = TaskService::new(&state.db);
    let task_to_update = service.find_task(task_id.id()).await?;
    let changes = TaskChanges::try_from(resource::accept_json(payload)?)?;
    let task = service.update_task(task_to_update, changes).await?;
    Ok(Json(TaskResponse::from(task)))
}

/// Handler for PATCH /tasks/{task_id}/{action} - Marks a task complete or incomplete.
///
/// Completing a task sends a best-effort notification once the change is stored.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    patch,
    path = "/tasks/{task_id}/{action}",
    params(
        ("task_id" = String, Path, description = "Task identifier"),
        ("action" = String, Path, description = "`mark_complete`; anything else marks the task incomplete")
    ),
    responses(
        (status = 200, description = "Completion updated", body = TaskResponse),
        (status = 400, description = "Identifier is not an integer", body = MessageResponse),
        (status = 404, description = "Task not found", body = MessageResponse)
    ),
    tag = "Tasks"
)]
pub async fn mark_task_handler(
    State(state): State<Arc<TaskState>>,
    tokens: PathTokens,
) -> Result<Json<TaskResponse>, ResourceError> {
    let service = TaskService::new(&state.db);
    let task_to_update = service.find_task(tokens.id()).await?;
    let action = CompletionAction::from_path_segment(tokens.get(1));
    let task = service.set_completion(task_to_update, action).await?;

    if action == CompletionAction::MarkComplete {
        notify::notify_best_effort(state.notifier.as_ref(), &completion_message(&task)).await;
    }

    Ok(Json(TaskResponse::from(task)))
}

/// Handler for DELETE /tasks/{task_id} - Deletes a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/tasks/{task_id}",
    params(("task_id" = String, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task deleted", body = DetailsResponse),
        (status = 400, description = "Identifier is not an integer", body = MessageResponse),
        (status = 404, description = "Task not found", body = MessageResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    task_id: PathTokens,
) -> Result<Json<DetailsResponse>, ResourceError> {
    let service = TaskService::new(&state.db);
    let task_to_delete = service.find_task(task_id.id()).await?;
    let deleted = service.delete_task(task_to_delete).await?;
    tracing::info!("Deleted task {}", deleted.id());
    Ok(Json(DetailsResponse::new(format!(
        "Task {} \"{}\" successfully deleted",
        deleted.id(),
        deleted.title()
    ))))
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/tasks", get(get_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{task_id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .route("/tasks/{task_id}/{action}", patch(mark_task_handler))
        .with_state(state)
}

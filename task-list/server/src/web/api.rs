use std::sync::Arc;

use crate::goal::api::v1::{GoalJson, GoalPayload, GoalResponse, GoalState};
use crate::resource::{DetailsResponse, MessageResponse};
use crate::task::api::v1::{
    CreateTaskPayload, TaskJson, TaskResponse, TaskState, UpdateTaskPayload,
};

use axum::Router;
use utoipa::OpenApi;

/// OpenAPI description of the task and goal endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::task::api::v1::create_task_handler,
        crate::task::api::v1::get_tasks_handler,
        crate::task::api::v1::get_task_handler,
        crate::task::api::v1::update_task_handler,
        crate::task::api::v1::mark_task_handler,
        crate::task::api::v1::delete_task_handler,
        crate::goal::api::v1::create_goal_handler,
        crate::goal::api::v1::get_goals_handler,
        crate::goal::api::v1::get_goal_handler,
        crate::goal::api::v1::update_goal_handler,
        crate::goal::api::v1::delete_goal_handler,
    ),
    components(schemas(
        TaskJson,
        TaskResponse,
        CreateTaskPayload,
        UpdateTaskPayload,
        GoalJson,
        GoalResponse,
        GoalPayload,
        DetailsResponse,
        MessageResponse,
    )),
    tags(
        (name = "Tasks", description = "Task management"),
        (name = "Goals", description = "Goal management")
    )
)]
pub struct ApiDoc;

/// Creates the JSON API routes for tasks and goals.
pub fn create_api_router(task_state: Arc<TaskState>, goal_state: Arc<GoalState>) -> Router {
    let tasks_router = crate::task::api::v1::create_api_router(task_state);
    let goals_router = crate::goal::api::v1::create_api_router(goal_state);
    Router::new().merge(tasks_router).merge(goals_router)
}

use crate::goal::{Goal, GoalService};
use crate::resource::{self, DetailsResponse, MessageResponse, PathTokens, ResourceError};
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone, Debug)]
pub struct GoalState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// JSON representation of a Goal for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GoalJson {
    /// Unique identifier for the goal
    id: i32,
    title: String,
}

impl From<Goal> for GoalJson {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id(),
            title: goal.title().to_string(),
        }
    }
}

/// API response wrapping a single goal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GoalResponse {
    goal: GoalJson,
}

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        Self {
            goal: GoalJson::from(goal),
        }
    }
}

/// Request body for creating or renaming a goal.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GoalPayload {
    title: Option<String>,
}

/// Handler for POST /goals - Creates a goal.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/goals",
    request_body = GoalPayload,
    responses(
        (status = 201, description = "Goal created", body = GoalResponse),
        (status = 400, description = "Missing title", body = DetailsResponse)
    ),
    tag = "Goals"
)]
pub async fn create_goal_handler(
    State(state): State<Arc<GoalState>>,
    payload: Result<Json<GoalPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<GoalResponse>), ResourceError> {
    let title = resource::required(resource::accept_json(payload)?.title)?;
    let service = GoalService::new(&state.db);
    let goal = service.create_goal(title).await?;
    tracing::info!("Created goal {}", goal.id());
    Ok((StatusCode::CREATED, Json(GoalResponse::from(goal))))
}

/// Handler for GET /goals - Returns all goals.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/goals",
    responses(
        (status = 200, description = "Successfully retrieved goals", body = [GoalJson])
    ),
    tag = "Goals"
)]
pub async fn get_goals_handler(
    State(state): State<Arc<GoalState>>,
) -> Result<Json<Vec<GoalJson>>, ResourceError> {
    let service = GoalService::new(&state.db);
    let goals = service.get_all_goals().await?;
    Ok(Json(goals.into_iter().map(GoalJson::from).collect()))
}

/// Handler for GET /goals/{goal_id} - Returns one goal.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/goals/{goal_id}",
    params(("goal_id" = String, Path, description = "Goal identifier")),
    responses(
        (status = 200, description = "Goal found", body = GoalResponse),
        (status = 400, description = "Identifier is not an integer", body = MessageResponse),
        (status = 404, description = "Goal not found", body = MessageResponse)
    ),
    tag = "Goals"
)]
pub async fn get_goal_handler(
    State(state): State<Arc<GoalState>>,
    goal_id: PathTokens,
) -> Result<Json<GoalResponse>, ResourceError> {
    let service = GoalService::new(&state.db);
    let goal = service.get_goal(goal_id.id()).await?;
    Ok(Json(GoalResponse::from(goal)))
}

/// Handler for PUT /goals/{goal_id} - Renames a goal.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/goals/{goal_id}",
    params(("goal_id" = String, Path, description = "Goal identifier")),
    request_body = GoalPayload,
    responses(
        (status = 200, description = "Goal updated", body = GoalResponse),
        (status = 400, description = "Invalid identifier or payload"),
        (status = 404, description = "Goal not found", body = MessageResponse)
    ),
    tag = "Goals"
)]
pub async fn update_goal_handler(
    State(state): State<Arc<GoalState>>,
    goal_id: PathTokens,
    payload: Result<Json<GoalPayload>, JsonRejection>,
) -> Result<Json<GoalResponse>, ResourceError> {
    let service = GoalService::new(&state.db);
    let goal_to_update = service.find_goal(goal_id.id()).await?;
    let title = resource::required(resource::accept_json(payload)?.title)?;
    let goal = service.update_goal(goal_to_update, title).await?;
    Ok(Json(GoalResponse::from(goal)))
}

/// Handler for DELETE /goals/{goal_id} - Deletes a goal.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/goals/{goal_id}",
    params(("goal_id" = String, Path, description = "Goal identifier")),
    responses(
        (status = 200, description = "Goal deleted", body = DetailsResponse),
        (status = 400, description = "Identifier is not an integer", body = MessageResponse),
        (status = 404, description = "Goal not found", body = MessageResponse)
    ),
    tag = "Goals"
)]
pub async fn delete_goal_handler(
    State(state): State<Arc<GoalState>>,
    goal_id: PathTokens,
) -> Result<Json<DetailsResponse>, ResourceError> {
    let service = GoalService::new(&state.db);
    let goal_to_delete = service.find_goal(goal_id.id()).await?;
    let deleted = service.delete_goal(goal_to_delete).await?;
    tracing::info!("Deleted goal {}", deleted.id());
    Ok(Json(DetailsResponse::new(format!(
        "Goal {} \"{}\" successfully deleted",
        deleted.id(),
        deleted.title()
    ))))
}

/// Creates and returns the goals API router.
pub fn create_api_router(state: Arc<GoalState>) -> Router {
    Router::new()
        .route("/goals", get(get_goals_handler).post(create_goal_handler))
        .route(
            "/goals/{goal_id}",
            get(get_goal_handler)
                .put(update_goal_handler)
                .delete(delete_goal_handler),
        )
        .with_state(state)
}

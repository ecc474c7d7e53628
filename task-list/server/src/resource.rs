//! Identifier resolution and request failures shared by the task and goal APIs.
//!
//! Every single-entity operation resolves its path identifier through
//! [`resolve`] before it reads or mutates anything, so a malformed or unknown
//! identifier never leaves a partial write behind.

use axum::{
    Json,
    extract::{FromRequestParts, MatchedPath, RawPathParams, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use sea_orm::{DatabaseConnection, EntityTrait, PrimaryKeyTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{goal, task};

/// A collection whose rows are addressed by an integer path identifier.
pub trait Resource: EntityTrait {
    /// Lower-case name used in error messages, e.g. `task`.
    const NAME: &'static str;
}

impl Resource for task::Entity {
    const NAME: &'static str = "task";
}

impl Resource for goal::Entity {
    const NAME: &'static str = "goal";
}

/// Failures a task or goal request can end with.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The path identifier is not an integer.
    #[error("{resource} {token} invalid")]
    InvalidIdentifier {
        resource: &'static str,
        token: String,
    },
    /// The identifier is well formed but no row carries it.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i32 },
    /// The request body is missing a required field or is not usable JSON.
    #[error("Invalid data")]
    InvalidPayload,
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// JSON body for identifier failures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// JSON body for payload failures and delete confirmations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DetailsResponse {
    pub details: String,
}

impl DetailsResponse {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
        }
    }
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        match self {
            ResourceError::InvalidIdentifier { .. } => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse {
                    message: self.to_string(),
                }),
            )
                .into_response(),
            ResourceError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(MessageResponse {
                    message: self.to_string(),
                }),
            )
                .into_response(),
            ResourceError::InvalidPayload => (
                StatusCode::BAD_REQUEST,
                Json(DetailsResponse::new(self.to_string())),
            )
                .into_response(),
            ResourceError::Database(err) => {
                tracing::error!("Database error while handling request: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(DetailsResponse::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

/// Parses a raw path token into a row identifier for `R`.
pub fn parse_id<R: Resource>(token: &str) -> Result<i32, ResourceError> {
    token
        .parse::<i32>()
        .map_err(|_| ResourceError::InvalidIdentifier {
            resource: R::NAME,
            token: token.to_string(),
        })
}

/// Resolves a raw path token into the stored row it names.
///
/// # Returns
///
/// The row if the token parses and a row with that id exists,
/// `InvalidIdentifier` if it does not parse, `NotFound` if nothing matches.
#[tracing::instrument(skip(db))]
pub async fn resolve<R>(db: &DatabaseConnection, token: &str) -> Result<R::Model, ResourceError>
where
    R: Resource,
    i32: Into<<R::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let id = parse_id::<R>(token)?;
    R::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ResourceError::NotFound {
            resource: R::NAME,
            id,
        })
}

/// Path parameters in route order, kept as raw tokens for [`resolve`].
///
/// Extraction never fails. A parameter that does not percent-decode to UTF-8
/// is passed on exactly as it appeared in the URI, so the validator reports it
/// like any other malformed identifier.
#[derive(Debug, Default)]
pub struct PathTokens(Vec<String>);

impl PathTokens {
    /// The first path parameter, which is always the resource identifier.
    pub fn id(&self) -> &str {
        self.get(0)
    }

    /// The parameter at `index`, or an empty token when the route has fewer.
    pub fn get(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for PathTokens
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match RawPathParams::from_request_parts(parts, state).await {
            Ok(params) => Ok(Self(
                params.iter().map(|(_, value)| value.to_string()).collect(),
            )),
            Err(rejection) => {
                tracing::debug!("Falling back to raw path segments: {}", rejection);
                Ok(Self(raw_segments(parts)))
            }
        }
    }
}

/// Pairs the matched route pattern with the request path and keeps the
/// segments that sit under a `{param}`.
fn raw_segments(parts: &Parts) -> Vec<String> {
    let Some(matched) = parts.extensions.get::<MatchedPath>() else {
        return Vec::new();
    };
    matched
        .as_str()
        .split('/')
        .zip(parts.uri.path().split('/'))
        .filter(|(pattern, _)| pattern.starts_with('{'))
        .map(|(_, segment)| segment.to_string())
        .collect()
}

/// Unwraps an extracted JSON body, turning any rejection into `InvalidPayload`.
pub fn accept_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ResourceError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection);
            Err(ResourceError::InvalidPayload)
        }
    }
}

/// Returns the field value, or `InvalidPayload` when the request left it out.
pub fn required<T>(field: Option<T>) -> Result<T, ResourceError> {
    field.ok_or(ResourceError::InvalidPayload)
}

use axum::Router;
use migration::MigratorTrait;
use sea_orm::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config;
use crate::goal::api::v1::GoalState;
use crate::notify::{self, Notifier};
use crate::task::api::v1::TaskState;

pub mod api;

/// Builds the full application router on top of an open database connection.
pub fn create_app(db: Arc<sea_orm::DatabaseConnection>, notifier: Arc<dyn Notifier>) -> Router {
    let task_state = Arc::new(TaskState {
        db: db.clone(),
        notifier,
    });
    let goal_state = Arc::new(GoalState { db });

    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(api::create_api_router(task_state, goal_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let notifier = notify::notifier_from_config(&config)?;
    let app = create_app(Arc::new(db), notifier);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

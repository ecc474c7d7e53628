use axum::http::{Method, StatusCode};
use serde_json::json;
use std::sync::Arc;
use task_list_server::notify::NoopNotifier;
use testcontainers_modules::{postgres, testcontainers};

mod common;

use common::TestContext;

/// Test context backed by a PostgreSQL container.
pub struct PostgresTestContext {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub context: TestContext,
}

async fn setup() -> anyhow::Result<PostgresTestContext> {
    let container = common::setup_container().await?;
    let db = common::setup_postgres_db(&container).await?;
    Ok(PostgresTestContext {
        container,
        context: TestContext::new(db, Arc::new(NoopNotifier)),
    })
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn can_round_trip_task_lifecycle_on_postgres() {
    let state = setup().await.expect("Failed to setup test context");
    let context = &state.context;

    let (status, body) = context
        .send(
            Method::POST,
            "/tasks",
            Some(json!({
                "title": "Deploy",
                "description": "Ship it",
                "completed_at": "2024-05-01 09:00:00"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["task"]["is_complete"], json!(true));
    let id = body["task"]["id"].as_i64().unwrap();

    let (status, body) = context
        .send(Method::PATCH, &format!("/tasks/{}/mark_incomplete", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["is_complete"], json!(false));

    let (status, _) = context
        .send(Method::DELETE, &format!("/tasks/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn can_sort_by_title_on_postgres() {
    let state = setup().await.expect("Failed to setup test context");
    let context = &state.context;
    for title in ["b", "a", "c"] {
        context
            .send(
                Method::POST,
                "/tasks",
                Some(json!({ "title": title, "description": "" })),
            )
            .await;
    }

    let (_, body) = context.send(Method::GET, "/tasks?sort=desc", None).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["c", "b", "a"]);
}

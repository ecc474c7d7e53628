use axum::http::{Method, StatusCode};
use insta::assert_yaml_snapshot;
use sea_orm::EntityTrait;
use serde_json::json;
use task_list_server::entities::goal;
use task_list_server::goal::GoalService;

mod common;

use common::setup;

#[tokio::test]
async fn can_create_goal() {
    let context = setup().await.expect("Failed to setup test context");

    let (status, body) = context
        .send(Method::POST, "/goals", Some(json!({ "title": "Run a marathon" })))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "goal": { "id": 1, "title": "Run a marathon" } }));
}

#[tokio::test]
async fn can_reject_goal_without_title_and_add_no_row() {
    let context = setup().await.expect("Failed to setup test context");

    let (status, body) = context.send(Method::POST, "/goals", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "details": "Invalid data" }));

    let goals = GoalService::new(&context.db)
        .get_all_goals()
        .await
        .expect("Failed to get all goals");
    assert!(goals.is_empty());
}

#[tokio::test]
async fn can_list_goals() {
    let context = setup().await.expect("Failed to setup test context");
    for title in ["Walk the dog", "Learn Rust"] {
        context
            .send(Method::POST, "/goals", Some(json!({ "title": title })))
            .await;
    }

    let (status, body) = context.send(Method::GET, "/goals", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_yaml_snapshot!(body, @r"
    - id: 1
      title: Walk the dog
    - id: 2
      title: Learn Rust
    ");
}

#[tokio::test]
async fn can_get_goal_and_validate_identifier() {
    let context = setup().await.expect("Failed to setup test context");
    context
        .send(Method::POST, "/goals", Some(json!({ "title": "Save money" })))
        .await;

    let (status, body) = context.send(Method::GET, "/goals/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "goal": { "id": 1, "title": "Save money" } }));

    let (status, body) = context.send(Method::GET, "/goals/one", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "goal one invalid" }));

    let (status, body) = context.send(Method::DELETE, "/goals/%FF", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "goal %FF invalid" }));

    let (status, body) = context.send(Method::GET, "/goals/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "goal 9999 not found" }));
}

#[tokio::test]
async fn can_rename_goal() {
    let context = setup().await.expect("Failed to setup test context");
    context
        .send(Method::POST, "/goals", Some(json!({ "title": "Old title" })))
        .await;

    let (status, body) = context
        .send(Method::PUT, "/goals/1", Some(json!({ "title": "New title" })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "goal": { "id": 1, "title": "New title" } }));
}

#[tokio::test]
async fn can_reject_rename_without_title_and_keep_goal() {
    let context = setup().await.expect("Failed to setup test context");
    context
        .send(Method::POST, "/goals", Some(json!({ "title": "Keep me" })))
        .await;

    let (status, body) = context
        .send(Method::PUT, "/goals/1", Some(json!({ "name": "Wrong key" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "details": "Invalid data" }));

    let stored = goal::Entity::find_by_id(1)
        .one(context.db.as_ref())
        .await
        .expect("Failed to query goal")
        .expect("Goal should still exist");
    assert_eq!(stored.title, "Keep me");
}

#[tokio::test]
async fn can_delete_goal() {
    let context = setup().await.expect("Failed to setup test context");
    context
        .send(Method::POST, "/goals", Some(json!({ "title": "Quit coffee" })))
        .await;

    let (status, body) = context.send(Method::DELETE, "/goals/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "details": "Goal 1 \"Quit coffee\" successfully deleted" })
    );

    let (status, body) = context.send(Method::GET, "/goals/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "goal 1 not found" }));
}

//! Route-level tests: requests go through the full router against a
//! file-backed SQLite store in a temp directory.

use std::sync::Arc;

use agentctl_core::db::schema;
use agentctl_core::{DatabaseConfig, Db};
use agentctl_server::{build_router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

async fn test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}/api.db?mode=rwc", dir.path().display());
    let db = Db::connect(&DatabaseConfig::new(url))
        .await
        .expect("connect");
    schema::init(&db).await.expect("init");
    (build_router(Arc::new(AppState::new(db))), dir)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    // Extractor rejections (e.g. bad enum values) produce plain-text
    // bodies; surface those as strings instead of failing the parse.
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// POST helper returning the created row's id.
async fn create(app: &Router, uri: &str, body: Value) -> i64 {
    let (status, value) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create {uri}: {value}");
    value["id"].as_i64().expect("id")
}

#[tokio::test]
async fn welcome_and_health() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "agentctl");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "sqlite");
}

#[tokio::test]
async fn holding_crud_lifecycle() {
    let (app, _dir) = test_app().await;

    let id = create(&app, "/holdings", json!({"name": "Tech Corp"})).await;

    let (status, body) = send(&app, Method::GET, &format!("/holdings/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Tech Corp");
    assert_eq!(body["description"], Value::Null);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/holdings/{id}"),
        Some(json!({"description": "parent organization"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Tech Corp");
    assert_eq!(body["description"], "parent organization");

    let (status, body) = send(&app, Method::GET, "/holdings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], id);

    let (status, _) = send(&app, Method::DELETE, &format!("/holdings/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/holdings/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn duplicate_holding_name_is_a_conflict() {
    let (app, _dir) = test_app().await;

    create(&app, "/holdings", json!({"name": "Tech Corp"})).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/holdings",
        Some(json!({"name": "Tech Corp"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn empty_name_is_a_validation_error() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(&app, Method::POST, "/holdings", Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn unknown_enum_value_is_rejected() {
    let (app, _dir) = test_app().await;

    // Deserialization of the closed enum fails before any write happens.
    let (status, _) = send(
        &app,
        Method::POST,
        "/tasks",
        Some(json!({"title": "X", "priority": "critical"})),
    )
    .await;
    assert!(status.is_client_error(), "got {status}");

    let (status, body) = send(&app, Method::GET, "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0, "nothing persisted");
}

async fn seed_hierarchy(app: &Router) -> (i64, i64, i64, i64) {
    let holding = create(app, "/holdings", json!({"name": "Tech Corp"})).await;
    let company = create(
        app,
        "/companies",
        json!({"name": "Software Inc", "holding_id": holding}),
    )
    .await;
    let department = create(
        app,
        "/departments",
        json!({"name": "Engineering", "company_id": company}),
    )
    .await;
    let agent = create(
        app,
        "/agents",
        json!({
            "name": "John Doe",
            "role": "Developer",
            "department_id": department,
            "status": "active"
        }),
    )
    .await;
    (holding, company, department, agent)
}

#[tokio::test]
async fn deleting_a_holding_cascades_through_the_api() {
    let (app, _dir) = test_app().await;
    let (holding, _company, _department, agent) = seed_hierarchy(&app).await;

    let task = create(
        &app,
        "/tasks",
        json!({"title": "Implement feature X", "priority": "high", "agent_id": agent}),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, &format!("/holdings/{holding}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for uri in ["/companies", "/departments", "/agents", "/tasks"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0, "{uri} should be empty");
    }

    let (status, _) = send(&app, Method::GET, &format!("/tasks/{task}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn company_with_dangling_holding_is_a_conflict() {
    let (app, _dir) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/companies",
        Some(json!({"name": "Orphan Inc", "holding_id": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn agent_status_filter_via_query_string() {
    let (app, _dir) = test_app().await;
    let (_, _, department, first) = seed_hierarchy(&app).await;

    let second = create(
        &app,
        "/agents",
        json!({
            "name": "Jane Roe",
            "role": "Analyst",
            "department_id": department,
            "status": "inactive"
        }),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/agents?status=active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], first);

    // Flip the second agent to active; the filter must see the last
    // written status.
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/agents/{second}"),
        Some(json!({"status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/agents?status=active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn task_filters_and_pagination() {
    let (app, _dir) = test_app().await;

    for i in 0..3 {
        create(
            &app,
            "/tasks",
            json!({"title": format!("task {i}"), "priority": "high"}),
        )
        .await;
    }
    create(&app, "/tasks", json!({"title": "low prio", "priority": "low"})).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/tasks?priority=high&status=pending&per_page=2",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["items"].as_array().expect("items").len(), 2);
    assert_eq!(body["per_page"], 2);
}

#[tokio::test]
async fn run_agent_records_log_and_execution_atomically() {
    let (app, _dir) = test_app().await;
    let (_, _, _, agent) = seed_hierarchy(&app).await;

    let task = create(
        &app,
        "/tasks",
        json!({"title": "Implement feature X", "priority": "high", "agent_id": agent}),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/agents/{agent}/run"),
        Some(json!({"task_id": task})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "run failed: {body}");
    assert_eq!(body["result"], "Task completed: Implement feature X");
    assert_eq!(body["task_status"], "completed");
    let execution_id = body["execution_id"].as_i64().expect("execution id");

    // Execution recorded and visible.
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/tasks/{task}/executions"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], execution_id);
    assert_eq!(
        body["items"][0]["result"]["output"],
        "Task completed: Implement feature X"
    );

    // Log entry recorded.
    let (status, body) = send(&app, Method::GET, &format!("/agents/{agent}/logs"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    // Task moved to completed.
    let (status, body) = send(&app, Method::GET, &format!("/tasks/{task}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
}

#[tokio::test]
async fn run_rejects_inactive_agents_without_writing() {
    let (app, _dir) = test_app().await;
    let (_, _, _, agent) = seed_hierarchy(&app).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/agents/{agent}"),
        Some(json!({"status": "suspended"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/agents/{agent}/run"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, body) = send(&app, Method::GET, &format!("/agents/{agent}/logs"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0, "rejected run must leave no log entry");
}

#[tokio::test]
async fn run_against_missing_task_is_not_found() {
    let (app, _dir) = test_app().await;
    let (_, _, _, agent) = seed_hierarchy(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/agents/{agent}/run"),
        Some(json!({"task_id": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, body) = send(&app, Method::GET, &format!("/agents/{agent}/logs"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0, "aborted run must leave no partial writes");
}

#[tokio::test]
async fn users_unique_and_linked_to_agents() {
    let (app, _dir) = test_app().await;
    let (_, _, department, _) = seed_hierarchy(&app).await;

    let user = create(
        &app,
        "/users",
        json!({"username": "jdoe", "email": "jdoe@example.com"}),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"username": "jdoe", "email": "other@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    create(
        &app,
        "/agents",
        json!({
            "name": "Linked Agent",
            "role": "Operator",
            "department_id": department,
            "user_id": user
        }),
    )
    .await;

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{user}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The linked agent goes with the user; the seeded agent stays.
    let (status, body) = send(&app, Method::GET, "/agents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "John Doe");
}

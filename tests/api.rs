use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use exercise_tracker::routes::{app, AppState};
use exercise_tracker::storage::TrackerStorage;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(TrackerStorage::with_data_dir(dir.path()).unwrap());
    (app(Arc::new(AppState { storage })), dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post_form(app: &Router, path: &str, body: &str) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, path: &str) -> (StatusCode, Bytes) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    send(app, request).await
}

#[tokio::test]
async fn create_user_echoes_username_as_user_id() {
    let (app, _dir) = test_app();

    let (status, body) = post_json(
        &app,
        "/api/exercise/new-user",
        json!({ "username": "alice" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value, json!({ "username": "alice", "userId": "alice" }));
}

#[tokio::test]
async fn duplicate_username_is_a_validation_error() {
    let (app, _dir) = test_app();

    post_json(
        &app,
        "/api/exercise/new-user",
        json!({ "username": "alice" }),
    )
    .await;
    let (status, body) = post_json(
        &app,
        "/api/exercise/new-user",
        json!({ "username": "alice" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(&body[..], b"Username already exists");
}

#[tokio::test]
async fn missing_username_is_rejected() {
    let (app, _dir) = test_app();

    let (status, body) = post_json(&app, "/api/exercise/new-user", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(&body[..], b"You must provide an username");

    let (status, _) = post_json(&app, "/api/exercise/new-user", json!({ "username": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn form_encoded_bodies_are_accepted() {
    let (app, _dir) = test_app();

    let (status, body) = post_form(&app, "/api/exercise/new-user", "username=bob").await;
    assert_eq!(status, StatusCode::CREATED);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["userId"], "bob");

    let (status, _) = post_form(
        &app,
        "/api/exercise/add",
        "userId=bob&description=run&duration=30&date=2023-05-01",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn log_requires_user_id() {
    let (app, _dir) = test_app();

    let (status, body) = get(&app, "/api/exercise/log").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(&body[..], b"UserId not provided");
}

#[tokio::test]
async fn log_for_unknown_user_is_not_found() {
    let (app, _dir) = test_app();

    let (status, body) = get(&app, "/api/exercise/log?userId=ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(&body[..], b"User not found");
}

#[tokio::test]
async fn add_exercise_round_trips_the_given_date() {
    let (app, _dir) = test_app();

    post_json(
        &app,
        "/api/exercise/new-user",
        json!({ "username": "alice" }),
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/api/exercise/add",
        json!({
            "userId": "alice",
            "description": "run",
            "duration": 30,
            "date": "2023-05-01"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        value,
        json!({
            "username": "alice",
            "description": "run",
            "duration": 30,
            "date": "2023-05-01"
        })
    );
}

#[tokio::test]
async fn add_exercise_with_missing_fields_is_rejected() {
    let (app, _dir) = test_app();

    post_json(
        &app,
        "/api/exercise/new-user",
        json!({ "username": "alice" }),
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/api/exercise/add",
        json!({ "userId": "alice", "description": "run" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(&body[..], b"UserId, description, duration not provided");
}

#[tokio::test]
async fn add_exercise_for_unknown_user_is_not_found() {
    let (app, _dir) = test_app();

    let (status, body) = post_json(
        &app,
        "/api/exercise/add",
        json!({ "userId": "ghost", "description": "run", "duration": 30 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(&body[..], b"User not found");
}

#[tokio::test]
async fn invalid_or_missing_date_defaults_to_today() {
    let (app, _dir) = test_app();

    post_json(
        &app,
        "/api/exercise/new-user",
        json!({ "username": "alice" }),
    )
    .await;

    let today = chrono::Utc::now().date_naive().to_string();

    let (status, body) = post_json(
        &app,
        "/api/exercise/add",
        json!({
            "userId": "alice",
            "description": "run",
            "duration": 30,
            "date": "2023-02-30"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["date"], today);

    let (status, body) = post_json(
        &app,
        "/api/exercise/add",
        json!({ "userId": "alice", "description": "swim", "duration": 45 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["date"], today);
}

#[tokio::test]
async fn log_supports_date_window_and_limit() {
    let (app, _dir) = test_app();

    post_json(
        &app,
        "/api/exercise/new-user",
        json!({ "username": "alice" }),
    )
    .await;
    for day in ["2023-01-01", "2023-02-01", "2023-03-01"] {
        let (status, _) = post_json(
            &app,
            "/api/exercise/add",
            json!({ "userId": "alice", "description": "run", "duration": 30, "date": day }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(&app, "/api/exercise/log?userId=alice&from=2023-01-15").await;
    assert_eq!(status, StatusCode::OK);
    let entries: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["date"], "2023-02-01");
    assert_eq!(entries[1]["date"], "2023-03-01");

    // to is an exclusive upper bound
    let (_, body) = get(
        &app,
        "/api/exercise/log?userId=alice&from=2023-01-15&to=2023-02-15",
    )
    .await;
    let entries: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["date"], "2023-02-01");

    let (_, body) = get(&app, "/api/exercise/log?userId=alice&limit=1").await;
    let entries: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["date"], "2023-01-01");
}

#[tokio::test]
async fn malformed_date_filters_are_silently_ignored() {
    let (app, _dir) = test_app();

    post_json(
        &app,
        "/api/exercise/new-user",
        json!({ "username": "alice" }),
    )
    .await;
    post_json(
        &app,
        "/api/exercise/add",
        json!({ "userId": "alice", "description": "run", "duration": 30, "date": "2023-02-01" }),
    )
    .await;

    // Wrong format and impossible calendar date both disable the filter
    let (status, body) = get(
        &app,
        "/api/exercise/log?userId=alice&from=23-02-01&to=2023-02-30",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn log_entries_expose_only_public_fields() {
    let (app, _dir) = test_app();

    post_json(
        &app,
        "/api/exercise/new-user",
        json!({ "username": "alice" }),
    )
    .await;
    post_json(
        &app,
        "/api/exercise/add",
        json!({ "userId": "alice", "description": "run", "duration": 30, "date": "2023-02-01" }),
    )
    .await;

    let (_, body) = get(&app, "/api/exercise/log?userId=alice").await;
    let entries: Vec<Value> = serde_json::from_slice(&body).unwrap();
    let mut keys: Vec<_> = entries[0].as_object().unwrap().keys().cloned().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["date", "description", "duration", "userId"]);
}

#[tokio::test]
async fn unknown_routes_fall_through_to_not_found() {
    let (app, _dir) = test_app();

    let (status, body) = get(&app, "/api/exercise/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(&body[..], b"not found");
}

#[tokio::test]
async fn index_page_is_served() {
    let (app, _dir) = test_app();

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("Exercise Tracker"));
}

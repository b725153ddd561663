use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::path::Path;
use tower::ServiceExt;

use rewards_api_server::config::Settings;
use rewards_api_server::state::AppState;
use rewards_api_server::{build_router, cors_layer};

fn app_with_catalog(path: &Path) -> Router {
    let mut settings = Settings::default();
    settings.catalog.path = path.to_path_buf();
    build_router(AppState::new(settings), cors_layer("*").unwrap())
}

fn write_catalog(dir: &tempfile::TempDir, value: &Value) -> std::path::PathBuf {
    let path = dir.path().join("videos.json");
    std::fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
    path
}

fn sample_catalog() -> Value {
    json!({
        "videos": [
            {"id": "v1", "creator": "ana", "tags": ["music", "viral"], "enabled": true},
            {"id": "v2", "creator": "bob", "tags": ["music"], "enabled": true},
            {"id": "v3", "creator": "ana", "tags": ["dance"], "enabled": true},
            {"id": "v4", "creator": "ana", "tags": ["music"], "enabled": false},
            {"id": "v5", "creator": "cyn", "tags": [], "enabled": true}
        ]
    })
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn feed_ids(body: &Value) -> Vec<&str> {
    body["videos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&write_catalog(&dir, &sample_catalog()));

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn feed_returns_enabled_videos_in_catalog_order() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&write_catalog(&dir, &sample_catalog()));

    let (status, body) = get_json(&app, "/feed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed_ids(&body), vec!["v1", "v2", "v3", "v5"]);
}

#[tokio::test]
async fn feed_filters_are_conjunctive() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&write_catalog(&dir, &sample_catalog()));

    let (_, body) = get_json(&app, "/feed?creator=ana").await;
    assert_eq!(feed_ids(&body), vec!["v1", "v3"]);

    let (_, body) = get_json(&app, "/feed?tag=music").await;
    assert_eq!(feed_ids(&body), vec!["v1", "v2"]);

    let (_, body) = get_json(&app, "/feed?creator=ana&tag=music").await;
    assert_eq!(feed_ids(&body), vec!["v1"]);

    let (_, body) = get_json(&app, "/feed?creator=ana&tag=nope").await;
    assert!(feed_ids(&body).is_empty());
}

#[tokio::test]
async fn feed_limit_defaults_and_caps() {
    let videos: Vec<Value> = (0..60)
        .map(|i| json!({"id": format!("v{i}"), "creator": "ana", "tags": [], "enabled": true}))
        .collect();
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&write_catalog(&dir, &json!({ "videos": videos })));

    let (_, body) = get_json(&app, "/feed").await;
    assert_eq!(feed_ids(&body).len(), 20);

    let (_, body) = get_json(&app, "/feed?limit=abc").await;
    assert_eq!(feed_ids(&body).len(), 20);

    let (_, body) = get_json(&app, "/feed?limit=5").await;
    assert_eq!(feed_ids(&body), (0..5).map(|i| format!("v{i}")).collect::<Vec<_>>());

    let (_, body) = get_json(&app, "/feed?limit=200").await;
    assert_eq!(feed_ids(&body).len(), 50);
}

#[tokio::test]
async fn feed_with_missing_catalog_is_a_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&dir.path().join("missing.json"));

    let (status, body) = get_json(&app, "/feed").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "catalog_unavailable");
}

#[tokio::test]
async fn feed_with_absent_videos_key_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&write_catalog(&dir, &json!({})));

    let (status, body) = get_json(&app, "/feed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"videos": []}));
}

#[tokio::test]
async fn session_start_then_ping_accumulates() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&write_catalog(&dir, &sample_catalog()));

    let (status, body) = post_json(&app, "/session/start", &json!({"tgUserId": "tg-1"})).await;
    assert_eq!(status, StatusCode::OK);
    let session_id = body["sessionId"].as_str().unwrap().to_string();
    assert!(session_id.len() >= 16);

    let (status, body) = post_json(
        &app,
        "/session/ping",
        &json!({"sessionId": session_id, "event": "proof_ok", "proofsDelta": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "session": {"proofs": 5, "videoCount": 0}}));

    let (_, body) = post_json(
        &app,
        "/session/ping",
        &json!({"sessionId": session_id, "proofsDelta": 3, "videoDelta": 1}),
    )
    .await;
    assert_eq!(body["session"], json!({"proofs": 8, "videoCount": 1}));

    // Non-positive deltas leave counters untouched.
    let (_, body) = post_json(
        &app,
        "/session/ping",
        &json!({"sessionId": session_id, "proofsDelta": -4, "videoDelta": 0}),
    )
    .await;
    assert_eq!(body["session"], json!({"proofs": 8, "videoCount": 1}));
}

#[tokio::test]
async fn session_start_without_body_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&write_catalog(&dir, &sample_catalog()));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session/start")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["sessionId"].as_str().unwrap().len() >= 16);
}

#[tokio::test]
async fn ping_unknown_session_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&write_catalog(&dir, &sample_catalog()));

    let (status, body) =
        post_json(&app, "/session/ping", &json!({"sessionId": "never-issued-id"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid_session"}));
}

#[tokio::test]
async fn ping_without_session_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&write_catalog(&dir, &sample_catalog()));

    let (status, body) =
        post_json(&app, "/session/ping", &json!({"event": "proof_ok"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid_session"}));

    let (status, body) = post_json(&app, "/session/ping", &json!({"sessionId": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "invalid_session"}));
}

#[tokio::test]
async fn distinct_starts_issue_distinct_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_catalog(&write_catalog(&dir, &sample_catalog()));

    let (_, first) = post_json(&app, "/session/start", &json!({})).await;
    let (_, second) = post_json(&app, "/session/start", &json!({})).await;
    assert_ne!(first["sessionId"], second["sessionId"]);
}

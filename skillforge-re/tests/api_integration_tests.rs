//! Integration tests for skillforge-re API endpoints

mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use helpers::*;
use http_body_util::BodyExt;
use skillforge_re::alerts::IndexAlertLog;
use skillforge_re::models::Difficulty;
use skillforge_re::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

/// Test helper: create test app with in-memory database
async fn create_test_app() -> (axum::Router, sqlx::SqlitePool) {
    let pool = create_test_pool().await;
    let state = AppState::new(pool.clone(), Arc::new(IndexAlertLog::in_memory()), None);
    let app = skillforge_re::build_router(state);
    (app, pool)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "skillforge-re");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_recommendations_endpoint_returns_success_envelope() {
    let (app, pool) = create_test_app().await;

    seed_course(
        &pool,
        &course("Security Foundations", "workshop", Difficulty::Beginner, 4),
    )
    .await;

    let uri = format!("/users/{}/recommendations", Uuid::new_v4());
    let response = app
        .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["recommendations"].is_array());
    assert_eq!(json["summary"]["user_level"], "Beginner");
}

#[tokio::test]
async fn test_recommendations_endpoint_honors_max_param() {
    let (app, pool) = create_test_app().await;

    for i in 0..6 {
        seed_course(
            &pool,
            &course(&format!("Course {}", i), "workshop", Difficulty::Beginner, 3),
        )
        .await;
    }

    let uri = format!("/users/{}/recommendations?max=2", Uuid::new_v4());
    let response = app
        .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["recommendations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_recommendations_endpoint_rejects_bad_uuid() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/not-a-uuid/recommendations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_alerts_lifecycle() {
    let (app, _pool) = create_test_app().await;

    // Empty to start
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/alerts").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    // Dismissing an unknown key is a 404
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/alerts/unknown-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Clearing is idempotent
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/alerts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_courses_list_and_reload() {
    let (app, pool) = create_test_app().await;

    // First access caches an empty-but-loaded catalog
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/courses").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    seed_course(
        &pool,
        &course("Network Basics", "network-security", Difficulty::Beginner, 5),
    )
    .await;

    // The cache is sticky until an explicit reload
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/courses").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/courses/reload")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["count"], 1);

    let response = app
        .oneshot(Request::builder().uri("/courses").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let courses = body_json(response).await;
    assert_eq!(courses.as_array().unwrap().len(), 1);
    assert_eq!(courses[0]["title"], "Network Basics");
}

#[tokio::test]
async fn test_advisor_key_status_and_validation() {
    let (app, _pool) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/settings/advisor-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["configured"], false);

    // Whitespace-only keys are rejected before touching the database
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/settings/advisor-key")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"api_key": "   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
}

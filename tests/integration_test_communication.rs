mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;
use tutoring_backend::domain::models::role::Role;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str, token: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_send_email_happy_path_is_recorded() {
    let app = TestApp::new().await;
    app.seed_account("tut", Role::Tutor).await;
    let token = app.mint_token("tut");

    let response = app.router.clone().oneshot(
        post("/api/v1/communication/send", &token, &json!({
            "to": "parent@example.com",
            "subject": "Progress update",
            "body": "Ada did great this week."
        }))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["status"], "sent");

    // The send lands in the activity trail with its subject
    let row: (String, Option<String>) = sqlx::query_as(
        "SELECT target, detail FROM activity_log WHERE action = 'email.sent'",
    )
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(row.0, "parent@example.com");
    assert_eq!(row.1.as_deref(), Some("Progress update"));
}

#[tokio::test]
async fn test_send_email_validates_its_input() {
    let app = TestApp::new().await;
    app.seed_account("tut", Role::Tutor).await;
    let token = app.mint_token("tut");

    let response = app.router.clone().oneshot(
        post("/api/v1/communication/send", &token, &json!({
            "to": "not-an-address",
            "subject": "Hello",
            "body": "text"
        }))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.router.clone().oneshot(
        post("/api/v1/communication/send", &token, &json!({
            "to": "parent@example.com",
            "subject": "  ",
            "body": "text"
        }))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sending_requires_a_session() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/communication/send")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "to": "parent@example.com",
                "subject": "Hello",
                "body": "text"
            }).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_subject_suggestion_uses_the_configured_model() {
    let app = TestApp::new().await;
    app.seed_account("tut", Role::Tutor).await;

    let response = app.router.clone().oneshot(
        post("/api/v1/communication/email-subject", &app.mint_token("tut"), &json!({
            "purpose": "Monthly progress report",
            "student_name": "Ada",
            "details": "Improved SAT math by 60 points"
        }))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["subject"], "Mock subject line");
}

#[tokio::test]
async fn test_subject_suggestion_without_a_key_is_a_client_error() {
    let app = TestApp::new_without_ai().await;
    app.seed_account("tut", Role::Tutor).await;

    let response = app.router.clone().oneshot(
        post("/api/v1/communication/email-subject", &app.mint_token("tut"), &json!({
            "purpose": "Monthly progress report"
        }))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(response).await;
    assert_eq!(body["error"], "AI subject generation is not configured");
}

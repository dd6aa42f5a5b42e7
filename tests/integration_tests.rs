mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// --- HAPPY PATH SCENARIOS ---

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_tutoring_lifecycle() {
    let app = TestApp::new().await;

    // 1. First sign-in claims the super admin seat
    let root_token = app.mint_token_with_profile("root-1", "root@example.com", "Root Admin");
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/setup/initial-admin")
            .header(header::AUTHORIZATION, format!("Bearer {}", root_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({}).to_string()))
            .unwrap(),
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let admin = parse_body(response).await;
    assert_eq!(admin["uid"], "root-1");
    assert_eq!(admin["role"], "super_admin");
    assert_eq!(admin["email"], "root@example.com");

    // 2. Super admin creates a manager
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/accounts")
            .header(header::AUTHORIZATION, format!("Bearer {}", root_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "uid": "mgr-1",
                "email": "mgr@example.com",
                "display_name": "Morgan Manager",
                "role": "manager_admin"
            }).to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 3. Super admin provisions a tutor; the role defaults when omitted
    let mgr_token = app.mint_token("mgr-1");
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/accounts")
            .header(header::AUTHORIZATION, format!("Bearer {}", root_token))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "uid": "tutor-1",
                "email": "tutor@example.com",
                "display_name": "Taylor Tutor",
                "subjects": ["math", "physics"]
            }).to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tutor = parse_body(response).await;
    assert_eq!(tutor["role"], "tutor");

    // 4. Tutor creates a student (defaults to their own roster)
    let tutor_token = app.mint_token("tutor-1");
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/students")
            .header(header::AUTHORIZATION, format!("Bearer {}", tutor_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "name": "Ada Lovelace",
                "grade": "11",
                "subjects": ["math"]
            }).to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let student = parse_body(response).await;
    let student_id = student["id"].as_str().unwrap().to_string();
    assert_eq!(student["tutor_uid"], "tutor-1");

    // 5. Tutor assigns work
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/students/{}/assignments", student_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", tutor_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "title": "Algebra drills",
                "subject": "math"
            }).to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let assignment = parse_body(response).await;
    assert_eq!(assignment["completed"], false);

    // 6. Tutor records an SAT score
    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/students/{}/scores", student_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", tutor_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({
                "kind": "sat",
                "test_date": "2026-03-14",
                "sections": [
                    {"name": "reading_writing", "score": 680},
                    {"name": "math", "score": 720}
                ],
                "composite": 1400
            }).to_string()))
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 7. Admin overview reflects the new records
    let response = app.router.clone().oneshot(
        Request::builder()
            .uri("/api/v1/admin/overview")
            .header(header::AUTHORIZATION, format!("Bearer {}", root_token))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let overview = parse_body(response).await;
    assert_eq!(overview["active_tutors"], 1);
    assert_eq!(overview["active_students"], 1);
    assert!(!overview["recent_activity"].as_array().unwrap().is_empty());

    // 8. The activity trail names the operations that happened
    let response = app.router.clone().oneshot(
        Request::builder()
            .uri("/api/v1/activity")
            .header(header::AUTHORIZATION, format!("Bearer {}", mgr_token))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let entries = parse_body(response).await;
    let actions: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"account.created"));
    assert!(actions.contains(&"student.created"));
    assert!(actions.contains(&"assignment.created"));
    assert!(actions.contains(&"score.recorded"));
}

// --- ERROR HANDLING SCENARIOS ---

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .uri("/api/v1/students")
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.router.clone().oneshot(
        Request::builder()
            .uri("/api/v1/students")
            .header(header::AUTHORIZATION, "Bearer not-a-real-token")
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_without_profile_is_forbidden() {
    let app = TestApp::new().await;
    app.seed_account("existing", tutoring_backend::domain::models::role::Role::SuperAdmin).await;

    // The token verifies fine but no user record matches its subject
    let token = app.mint_token("ghost-uid");
    let response = app.router.clone().oneshot(
        Request::builder()
            .uri("/api/v1/students")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

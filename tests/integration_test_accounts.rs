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

fn put(uri: &str, token: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_initial_admin_setup_is_one_shot() {
    let app = TestApp::new().await;

    let token = app.mint_token_with_profile("first", "first@example.com", "First One");
    let response = app.router.clone().oneshot(
        post("/api/v1/setup/initial-admin", &token, &json!({}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Second identity arrives too late, even with explicit fields
    let other = app.mint_token("second");
    let response = app.router.clone().oneshot(
        post("/api/v1/setup/initial-admin", &other, &json!({
            "email": "second@example.com",
            "display_name": "Second One"
        }))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_initial_admin_requires_an_email() {
    let app = TestApp::new().await;

    // Token carries no email claim and the body does not supply one
    let token = app.mint_token_with_profile("first", "", "First One");
    let response = app.router.clone().oneshot(
        post("/api/v1/setup/initial-admin", &token, &json!({}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_account_creation_is_super_admin_only() {
    let app = TestApp::new().await;
    app.seed_account("root", Role::SuperAdmin).await;
    app.seed_account("mgr", Role::ManagerAdmin).await;
    app.seed_account("tut", Role::Tutor).await;

    let payload = json!({
        "uid": "new-root",
        "email": "new-root@example.com",
        "display_name": "New Root",
        "role": "super_admin"
    });

    // Account provisioning is reserved to the super admin
    let response = app.router.clone().oneshot(
        post("/api/v1/accounts", &app.mint_token("tut"), &payload)
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.router.clone().oneshot(
        post("/api/v1/accounts", &app.mint_token("mgr"), &payload)
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.router.clone().oneshot(
        post("/api/v1/accounts", &app.mint_token("root"), &payload)
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = parse_body(response).await;
    assert_eq!(created["role"], "super_admin");
    assert_eq!(created["created_by"], "root");
}

#[tokio::test]
async fn test_duplicate_accounts_are_rejected() {
    let app = TestApp::new().await;
    app.seed_account("root", Role::SuperAdmin).await;
    let token = app.mint_token("root");

    let payload = json!({
        "uid": "tutor-a",
        "email": "tutor-a@example.com",
        "display_name": "Tutor A"
    });
    let response = app.router.clone().oneshot(post("/api/v1/accounts", &token, &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Same uid
    let response = app.router.clone().oneshot(post("/api/v1/accounts", &token, &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Fresh uid, same email
    let response = app.router.clone().oneshot(
        post("/api/v1/accounts", &token, &json!({
            "uid": "tutor-b",
            "email": "tutor-a@example.com",
            "display_name": "Tutor B"
        }))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_role_change_rules() {
    let app = TestApp::new().await;
    app.seed_account("root", Role::SuperAdmin).await;
    app.seed_account("mgr", Role::ManagerAdmin).await;
    app.seed_account("tut", Role::Tutor).await;

    // Tutors may not change roles
    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/mgr/role", &app.mint_token("tut"), &json!({"role": "tutor"}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A manager may promote a tutor to manager
    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/tut/role", &app.mint_token("mgr"), &json!({"role": "manager_admin"}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["role"], "manager_admin");

    // But not to super admin
    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/tut/role", &app.mint_token("mgr"), &json!({"role": "super_admin"}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The super admin may
    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/tut/role", &app.mint_token("root"), &json!({"role": "super_admin"}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["role"], "super_admin");
}

#[tokio::test]
async fn test_role_values_outside_the_catalog_are_rejected() {
    let app = TestApp::new().await;
    app.seed_account("root", Role::SuperAdmin).await;

    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/root/role", &app.mint_token("root"), &json!({"role": "owner"}))
    ).await.unwrap();

    // Serde refuses the unknown variant before any handler runs
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_archive_lifecycle() {
    let app = TestApp::new().await;
    app.seed_account("root", Role::SuperAdmin).await;
    app.seed_account("mgr", Role::ManagerAdmin).await;
    app.seed_account("tut", Role::Tutor).await;
    let root = app.mint_token("root");

    // Managers lack the archive grant for accounts
    let response = app.router.clone().oneshot(
        post("/api/v1/accounts/tut/archive", &app.mint_token("mgr"), &json!({}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // So do tutors, and the refused target is left untouched
    let response = app.router.clone().oneshot(
        post("/api/v1/accounts/mgr/archive", &app.mint_token("tut"), &json!({}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = app.router.clone().oneshot(get("/api/v1/accounts/mgr", &root)).await.unwrap();
    assert_eq!(parse_body(response).await["is_active"], true);

    // Nobody archives themselves
    let response = app.router.clone().oneshot(
        post("/api/v1/accounts/root/archive", &root, &json!({}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.router.clone().oneshot(
        post("/api/v1/accounts/tut/archive", &root, &json!({}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["is_active"], false);

    // Archiving again succeeds without doing anything
    let response = app.router.clone().oneshot(
        post("/api/v1/accounts/tut/archive", &root, &json!({}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The archived tutor's valid token no longer opens a session
    let response = app.router.clone().oneshot(
        get("/api/v1/students", &app.mint_token("tut"))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reactivation restores access
    let response = app.router.clone().oneshot(
        post("/api/v1/accounts/tut/reactivate", &root, &json!({}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["is_active"], true);

    let response = app.router.clone().oneshot(
        get("/api/v1/students", &app.mint_token("tut"))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_profile_update_semantics() {
    let app = TestApp::new().await;
    app.seed_account("root", Role::SuperAdmin).await;
    app.seed_account("tut", Role::Tutor).await;
    app.seed_account("other", Role::Tutor).await;
    let tut = app.mint_token("tut");

    // 1. Owners edit their own descriptive fields
    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/tut/profile", &tut, &json!({
            "bio": "Ten years of calculus tutoring",
            "location": "  Portland  "
        }))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_body(response).await;
    assert_eq!(updated["bio"], "Ten years of calculus tutoring");
    assert_eq!(updated["location"], "Portland");
    assert_eq!(updated["profile_updated_by"], "tut");
    let first_stamp = updated["profile_last_updated"].as_str().unwrap().to_string();

    // 2. An empty string clears a field instead of storing ""
    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/tut/profile", &tut, &json!({"bio": "   "}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = parse_body(response).await;
    assert!(cleared["bio"].is_null());

    // Every profile write advances the stamp
    let earlier = chrono::DateTime::parse_from_rfc3339(&first_stamp).unwrap();
    let later = chrono::DateTime::parse_from_rfc3339(
        cleared["profile_last_updated"].as_str().unwrap()
    ).unwrap();
    assert!(later > earlier);

    // 3. Admin-managed fields are off limits to the owner
    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/tut/profile", &tut, &json!({"hourly_rate": 95.0}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // 4. Tutors cannot touch someone else's profile
    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/other/profile", &tut, &json!({"bio": "hijacked"}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // 5. Admins set admin-managed fields and the stamp names them
    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/tut/profile", &app.mint_token("root"), &json!({
            "hourly_rate": 95.0,
            "admin_notes": "Strong SAT track record"
        }))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_body(response).await;
    assert_eq!(updated["hourly_rate"], 95.0);
    assert_eq!(updated["profile_updated_by"], "root");
}

#[tokio::test]
async fn test_negative_hourly_rate_is_rejected() {
    let app = TestApp::new().await;
    app.seed_account("root", Role::SuperAdmin).await;

    let response = app.router.clone().oneshot(
        put("/api/v1/accounts/root/profile", &app.mint_token("root"), &json!({"hourly_rate": -5.0}))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_account_listing_is_admin_only() {
    let app = TestApp::new().await;
    app.seed_account("root", Role::SuperAdmin).await;
    app.seed_account("mgr", Role::ManagerAdmin).await;
    app.seed_account("tut", Role::Tutor).await;
    let root = app.mint_token("root");

    let response = app.router.clone().oneshot(
        get("/api/v1/accounts", &app.mint_token("tut"))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Archive one account, then compare the two listing modes
    app.router.clone().oneshot(
        post("/api/v1/accounts/tut/archive", &root, &json!({}))
    ).await.unwrap();

    let response = app.router.clone().oneshot(get("/api/v1/accounts", &root)).await.unwrap();
    let active_only = parse_body(response).await;
    assert_eq!(active_only.as_array().unwrap().len(), 2);

    let response = app.router.clone().oneshot(
        get("/api/v1/accounts?include_archived=true", &root)
    ).await.unwrap();
    let everyone = parse_body(response).await;
    assert_eq!(everyone.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_account_visibility_is_self_or_admin() {
    let app = TestApp::new().await;
    app.seed_account("mgr", Role::ManagerAdmin).await;
    app.seed_account("tut", Role::Tutor).await;
    let tut = app.mint_token("tut");

    let response = app.router.clone().oneshot(get("/api/v1/accounts/tut", &tut)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.router.clone().oneshot(get("/api/v1/accounts/mgr", &tut)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.router.clone().oneshot(
        get("/api/v1/accounts/tut", &app.mint_token("mgr"))
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

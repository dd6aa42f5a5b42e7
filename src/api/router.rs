use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{accounts, activity, admin, assignments, communication, health, scores, session, setup, students};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Session & Bootstrap
        .route("/api/v1/session", get(session::current_session))
        .route("/api/v1/setup/initial-admin", post(setup::create_initial_admin))

        // Accounts
        .route("/api/v1/accounts", post(accounts::create_account).get(accounts::list_accounts))
        .route("/api/v1/accounts/{uid}", get(accounts::get_account))
        .route("/api/v1/accounts/{uid}/profile", put(accounts::update_profile))
        .route("/api/v1/accounts/{uid}/role", put(accounts::change_role))
        .route("/api/v1/accounts/{uid}/archive", post(accounts::archive_account))
        .route("/api/v1/accounts/{uid}/reactivate", post(accounts::reactivate_account))

        // Students
        .route("/api/v1/students", post(students::create_student).get(students::list_students))
        .route("/api/v1/students/{id}", get(students::get_student).put(students::update_student))
        .route("/api/v1/students/{id}/tutor", put(students::reassign_tutor))
        .route("/api/v1/students/{id}/archive", post(students::archive_student))
        .route("/api/v1/students/{id}/reactivate", post(students::reactivate_student))

        // Assignments
        .route("/api/v1/students/{id}/assignments", post(assignments::create_assignment).get(assignments::list_for_student))
        .route("/api/v1/assignments/{id}/complete", put(assignments::set_completed))
        .route("/api/v1/assignments/log", get(assignments::assignment_log))

        // Test Scores
        .route("/api/v1/students/{id}/scores", post(scores::record_score).get(scores::list_for_student))
        .route("/api/v1/score-tables", get(scores::score_tables))

        // Activity & Admin
        .route("/api/v1/activity", get(activity::list_activity))
        .route("/api/v1/admin/overview", get(admin::overview))

        // Communication
        .route("/api/v1/communication/send", post(communication::send_email))
        .route("/api/v1/communication/email-subject", post(communication::suggest_subject))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                        role = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}

/// Integration tests for the SkillTrack API
///
/// These exercise the router up to the database boundary: routing,
/// authentication, role gates, and input validation. The database pool
/// is lazy and never connects, so anything a handler rejects before its
/// first query is covered here. Flows that need real rows (assignment
/// reconciliation, membership backfill) run against the database tests
/// in the shared crate and a deployed environment.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use skilltrack_shared::models::employee::Role;
use tower::Service as _;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Protected routes reject requests without a token
#[tokio::test]
async fn missing_token_is_unauthorized() {
    let mut ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/api/competence")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Garbage in the Authorization header rejects with 401
#[tokio::test]
async fn malformed_token_is_unauthorized() {
    let mut ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/api/team")
        .header("authorization", "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A non-Bearer scheme is a malformed header, not a missing one
#[tokio::test]
async fn non_bearer_scheme_is_bad_request() {
    let mut ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/api/team")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Expected Bearer token");
}

/// A refresh token does not pass the access-token gate
#[tokio::test]
async fn refresh_token_rejected_on_protected_routes() {
    let mut ctx = TestContext::new();
    let token = ctx.refresh_token("e1", Role::Hr);

    let request = Request::builder()
        .method("GET")
        .uri("/api/team")
        .header("authorization", ctx.bearer(&token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// The employee listing is HR-only
#[tokio::test]
async fn employee_listing_requires_hr_role() {
    let mut ctx = TestContext::new();
    let token = ctx.access_token("e1", Role::Employee);

    let request = Request::builder()
        .method("GET")
        .uri("/api/employee")
        .header("authorization", ctx.bearer(&token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Competence writes are HR-only; a plain employee is turned away
/// before anything touches the database
#[tokio::test]
async fn competence_creation_requires_hr_role() {
    let mut ctx = TestContext::new();
    let token = ctx.access_token("e1", Role::Employee);

    let request = Request::builder()
        .method("POST")
        .uri("/api/competence")
        .header("authorization", ctx.bearer(&token))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "title": "Rust onboarding" }).to_string(),
        ))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Company creation is admin-only; HR is not enough
#[tokio::test]
async fn company_creation_requires_admin_role() {
    let mut ctx = TestContext::new();
    let token = ctx.access_token("e1", Role::Hr);

    let request = Request::builder()
        .method("POST")
        .uri("/api/company")
        .header("authorization", ctx.bearer(&token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "name": "Acme" }).to_string()))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// An hr_review-only update through the self-service path is refused
#[tokio::test]
async fn own_task_update_cannot_set_hr_review_alone() {
    let mut ctx = TestContext::new();
    let token = ctx.access_token("e1", Role::Employee);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/user_task/me/{}", uuid::Uuid::new_v4()))
        .header("authorization", ctx.bearer(&token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "hr_review": "looks great" }).to_string()))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Fuzzy search without a query is a 400 with a stable message
#[tokio::test]
async fn fuzzy_search_requires_query_parameter() {
    let mut ctx = TestContext::new();
    let token = ctx.access_token("e1", Role::Employee);

    let request = Request::builder()
        .method("GET")
        .uri("/api/search/fuzzy")
        .header("authorization", ctx.bearer(&token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Query parameter q is required");
}

/// Logout succeeds even without a refresh token
#[tokio::test]
async fn logout_without_token_is_a_no_op() {
    let mut ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/api/employee/logout")
        .header("content-type", "application/json")
        .body(Body::from(json!({}).to_string()))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

/// Health answers without auth and degrades instead of failing when the
/// database is unreachable
#[tokio::test]
async fn health_degrades_without_database() {
    let mut ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}

/// Security headers ride on every response
#[tokio::test]
async fn security_headers_are_applied() {
    let mut ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
    assert!(headers.get("Content-Security-Policy").is_some());
    // HSTS only appears in production mode
    assert!(headers.get("Strict-Transport-Security").is_none());
}

/// Unknown routes are plain 404s
#[tokio::test]
async fn unknown_route_is_not_found() {
    let mut ctx = TestContext::new();

    let request = Request::builder()
        .method("GET")
        .uri("/api/nonexistent")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Registration validates its payload before doing anything else
#[tokio::test]
async fn register_rejects_invalid_email() {
    let mut ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/api/employee/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "firstname": "Ada",
                "lastname": "Lovelace",
                "email": "not-an-email",
                "password": "secret123"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

/// Registration rejects short passwords with a field-level detail
#[tokio::test]
async fn register_rejects_short_password() {
    let mut ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/api/employee/register")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "firstname": "Ada",
                "lastname": "Lovelace",
                "email": "ada@example.com",
                "password": "short"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "password"));
}

/// No notification mail leaves the process during rejected requests
#[tokio::test]
async fn rejected_requests_send_no_mail() {
    let mut ctx = TestContext::new();
    let token = ctx.access_token("e1", Role::Employee);

    let request = Request::builder()
        .method("POST")
        .uri("/api/competence")
        .header("authorization", ctx.bearer(&token))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "title": "x" }).to_string()))
        .unwrap();

    let response = ctx.app.call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(ctx.mailer.sent().await.is_empty());
}

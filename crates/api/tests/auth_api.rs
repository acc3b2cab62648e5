//! HTTP-level tests for registration, login and the auth extractor.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, register};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use studyquest_api::auth::jwt::generate_token;
use studyquest_api::router::build_app_router;
use studyquest_api::state::AppState;

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_returns_token_and_user(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "luffy", "passphrase": "grand-line-1" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["token"].is_string());
    assert_eq!(json["data"]["expires_in"], 7 * 24 * 3_600);
    assert_eq!(json["data"]["user"]["username"], "luffy");
    assert!(json["data"]["user"].get("passphrase_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_is_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "zoro").await;

    let body = serde_json::json!({ "username": "zoro", "passphrase": "another-one" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "USERNAME_TAKEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn short_passphrase_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "nami", "passphrase": "123" });
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_correct_passphrase(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (user_id, _) = register(app.clone(), "sanji").await;

    let body = serde_json::json!({ "username": "sanji", "passphrase": "grand-line-1" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user"]["id"], user_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_failures_are_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "usopp").await;

    for (username, passphrase) in [("usopp", "wrong-pass"), ("nobody", "grand-line-1")] {
        let body = serde_json::json!({ "username": username, "passphrase": passphrase });
        let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn protected_routes_require_a_valid_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_for_unknown_account_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = generate_token(999_999, &common::test_config().jwt).unwrap();

    let body = serde_json::json!({ "duration": 600 });
    let response = common::post_json_auth(app, "/api/v1/sessions/end", &token, body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_uses_error_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/nowhere").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["ledger"]["reachable"], true);
    assert!(json["ledger"]["latency_ms"].is_u64());
}

#[tokio::test]
async fn health_is_unavailable_without_database() {
    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_millis(200))
        .connect_lazy("postgres://nobody@127.0.0.1:1/missing")
        .unwrap();
    let config = common::test_config();
    let app = build_app_router(AppState::new(pool, config.clone()), &config);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["ledger"]["reachable"], false);
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::json;
use tower::Service;
use uuid::Uuid;

use server::routes;
use server::routes::auth::ServerState;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::listings::repo::seaorm::SeaOrmListingRepository;
use service::listings::service::ListingService;

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect().await?;
    // Ensure schema; re-running on an already-migrated database is fine
    if let Err(e) = migration::Migrator::up(&db, None).await {
        let msg = format!("{}", e);
        if msg.contains("duplicate key value violates unique constraint") {
            eprintln!("migrations already applied, continue: {}", msg);
        } else {
            return Err(e.into());
        }
    }

    let auth = Arc::new(AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: db.clone() }),
        AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 24, password_algorithm: "argon2".into() },
    ));
    let listings = Arc::new(ListingService::new(Arc::new(SeaOrmListingRepository { db })));
    let state = ServerState { auth, listings };
    let debug = configs::DebugConfig { user_maintenance: true };
    Ok(routes::build_router(state, cors(), &debug))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";

    // Register
    let resp = app.clone().call(post_json(
        "/auth/register",
        json!({"email": email, "name": "Tester", "password": password, "business_name": "Test Co"}),
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // Login sets the auth cookie
    let resp = app.clone().call(post_json(
        "/auth/login",
        json!({"email": email, "password": password}),
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("set-cookie").is_some());
    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let resp = app.clone().call(post_json(
        "/auth/register",
        json!({"email": email, "name": "Tester", "password": "StrongPass123"}),
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().call(post_json(
        "/auth/login",
        json!({"email": email, "password": "wrong"}),
    )).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_register_short_password_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;

    let resp = app.clone().call(post_json(
        "/auth/register",
        json!({"email": format!("u_{}@example.com", Uuid::new_v4()), "name": "A", "password": "short"}),
    )).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let body = json!({"email": email, "name": "Tester", "password": "StrongPass123"});
    let resp = app.clone().call(post_json("/auth/register", body.clone())).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app.clone().call(post_json("/auth/register", body)).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn test_admin_login_rejects_members_like_wrong_passwords() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;

    let member_email = format!("member_{}@example.com", Uuid::new_v4());
    let admin_email = format!("admin_{}@example.com", Uuid::new_v4());
    let password = "StrongPass123";

    let resp = app.clone().call(post_json(
        "/auth/register",
        json!({"email": member_email, "name": "Member", "password": password}),
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app.clone().call(post_json(
        "/auth/create-admin",
        json!({"email": admin_email, "name": "Admin", "password": password}),
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // Member with correct password and admin with wrong password answer alike
    let resp = app.clone().call(post_json(
        "/auth/admin/login",
        json!({"email": member_email, "password": password}),
    )).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = app.clone().call(post_json(
        "/auth/admin/login",
        json!({"email": admin_email, "password": "not-the-password"}),
    )).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // The real admin gets in
    let resp = app.clone().call(post_json(
        "/auth/admin/login",
        json!({"email": admin_email, "password": password}),
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

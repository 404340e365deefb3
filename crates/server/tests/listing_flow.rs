use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use server::routes;
use server::routes::auth::ServerState;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::listings::repo::seaorm::SeaOrmListingRepository;
use service::listings::service::ListingService;

async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect().await?;
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
    Ok(routes::build_router(state, tower_http::cors::CorsLayer::very_permissive(), &debug))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&v).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json(resp: Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Registers a fresh member and returns its session token.
async fn register_member(app: &Router, name: &str) -> anyhow::Result<String> {
    let email = format!("{}_{}@example.com", name, Uuid::new_v4());
    let resp = app.clone().call(request(
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "name": name, "password": "StrongPass123"})),
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await?;
    Ok(body["token"].as_str().expect("register token").to_string())
}

/// Bootstraps an administrator through the debug route and logs it in.
async fn admin_token(app: &Router) -> anyhow::Result<String> {
    let email = format!("admin_{}@example.com", Uuid::new_v4());
    let resp = app.clone().call(request(
        "POST",
        "/auth/create-admin",
        None,
        Some(json!({"email": email, "name": "Moderator", "password": "StrongPass123"})),
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().call(request(
        "POST",
        "/auth/admin/login",
        None,
        Some(json!({"email": email, "password": "StrongPass123"})),
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await?;
    Ok(body["token"].as_str().expect("admin token").to_string())
}

fn listing_body(business_name: &str) -> Value {
    json!({
        "business_name": business_name,
        "contact_name": "Ada Contact",
        "email": "contact@example.com",
        "phone": "555-0100",
        "industry": "Technology",
        "membership_category": "Prime A",
        "description": "We build things.",
        "images": ["uploads/front.jpg"],
        "videos": []
    })
}

#[tokio::test]
async fn test_moderation_lifecycle() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;

    let owner = register_member(&app, "owner").await?;
    let business_name = format!("Lifecycle Co {}", Uuid::new_v4());

    // Submit: always starts pending with no approval timestamp
    let resp = app.clone().call(request("POST", "/listings", Some(&owner), Some(listing_body(&business_name)))).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = read_json(resp).await?;
    let id = created["id"].as_str().expect("listing id").to_string();
    assert_eq!(created["status"], "pending");
    assert!(created["approved_date"].is_null());

    // Not publicly visible before approval
    let resp = app.clone().call(request("GET", &format!("/listings/{}", id), None, None)).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Moderation queue shows it
    let admin = admin_token(&app).await?;
    let resp = app.clone().call(request("GET", "/admin/listings/pending", Some(&admin), None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let queue = read_json(resp).await?;
    assert!(queue.as_array().unwrap().iter().any(|l| l["id"] == id.as_str()));

    // Approve with reviewer notes
    let resp = app.clone().call(request(
        "PATCH",
        &format!("/admin/listings/{}/status", id),
        Some(&admin),
        Some(json!({"status": "approved", "review_notes": "Looks legitimate."})),
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = read_json(resp).await?;
    assert_eq!(updated["status"], "approved");
    assert!(!updated["approved_date"].is_null());
    assert_eq!(updated["review_notes"], "Looks legitimate.");

    // Now publicly visible, without the reviewer notes
    let resp = app.clone().call(request("GET", &format!("/listings/{}", id), None, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let public = read_json(resp).await?;
    assert_eq!(public["status"], "approved");
    assert!(public.get("review_notes").is_none());

    // And findable through the public search
    let resp = app.clone().call(request(
        "GET",
        &format!("/listings/approved?search={}", business_name.replace(' ', "%20")),
        None,
        None,
    )).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let found = read_json(resp).await?;
    assert!(found.as_array().unwrap().iter().any(|l| l["id"] == id.as_str()));

    // A decided listing cannot be decided again
    let resp = app.clone().call(request(
        "PATCH",
        &format!("/admin/listings/{}/status", id),
        Some(&admin),
        Some(json!({"status": "rejected"})),
    )).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_members_cannot_moderate() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;

    let owner = register_member(&app, "member").await?;
    let resp = app.clone().call(request(
        "POST", "/listings", Some(&owner),
        Some(listing_body(&format!("Member Co {}", Uuid::new_v4()))),
    )).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = read_json(resp).await?["id"].as_str().unwrap().to_string();

    let resp = app.clone().call(request(
        "PATCH",
        &format!("/admin/listings/{}/status", id),
        Some(&owner),
        Some(json!({"status": "approved"})),
    )).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app.clone().call(request("GET", "/admin/listings/pending", Some(&owner), None)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app.clone().call(request("GET", "/admin/statistics", Some(&owner), None)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn test_delete_is_owner_only() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;

    let owner = register_member(&app, "owner").await?;
    let stranger = register_member(&app, "stranger").await?;
    let admin = admin_token(&app).await?;

    let resp = app.clone().call(request(
        "POST", "/listings", Some(&owner),
        Some(listing_body(&format!("Deletable Co {}", Uuid::new_v4()))),
    )).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let id = read_json(resp).await?["id"].as_str().unwrap().to_string();

    // Neither another member nor an administrator may delete
    let resp = app.clone().call(request("DELETE", &format!("/listings/{}", id), Some(&stranger), None)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let resp = app.clone().call(request("DELETE", &format!("/listings/{}", id), Some(&admin), None)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Still in the owner's view after both refusals
    let resp = app.clone().call(request("GET", "/listings/mine", Some(&owner), None)).await?;
    let mine = read_json(resp).await?;
    assert!(mine.as_array().unwrap().iter().any(|l| l["id"] == id.as_str()));

    // The owner may
    let resp = app.clone().call(request("DELETE", &format!("/listings/{}", id), Some(&owner), None)).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = app.clone().call(request("GET", "/listings/mine", Some(&owner), None)).await?;
    let mine = read_json(resp).await?;
    assert!(!mine.as_array().unwrap().iter().any(|l| l["id"] == id.as_str()));
    Ok(())
}

#[tokio::test]
async fn test_statistics_always_report_the_tracked_buckets() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;

    let admin = admin_token(&app).await?;
    let resp = app.clone().call(request("GET", "/admin/statistics", Some(&admin), None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let stats = read_json(resp).await?;
    for bucket in ["pending", "approved", "rejected"] {
        assert!(stats.get(bucket).is_some(), "missing {} bucket", bucket);
    }
    Ok(())
}

#[tokio::test]
async fn test_token_required_on_protected_routes() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;

    let resp = app.clone().call(request("POST", "/listings", None, Some(listing_body("No Token Co")))).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = app.clone().call(request("GET", "/admin/listings/pending", None, None)).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Public surface stays open
    let resp = app.clone().call(request("GET", "/listings/categories", None, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = app.clone().call(request("GET", "/listings/approved", None, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_create_validates_input() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = build_app().await?;
    let owner = register_member(&app, "validator").await?;

    let mut blank_name = listing_body("ignored");
    blank_name["business_name"] = json!("   ");
    let resp = app.clone().call(request("POST", "/listings", Some(&owner), Some(blank_name))).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mut too_many_images = listing_body(&format!("Busy Co {}", Uuid::new_v4()));
    too_many_images["images"] = json!(["a", "b", "c", "d", "e", "f"]);
    let resp = app.clone().call(request("POST", "/listings", Some(&owner), Some(too_many_images))).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

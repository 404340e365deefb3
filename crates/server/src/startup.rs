use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::listings::repo::seaorm::SeaOrmListingRepository;
use service::listings::service::ListingService;

use crate::routes::{self, auth::ServerState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

/// Load and validate configuration; config.toml when present, env-only
/// otherwise. Fails fast when the token secret or database url is missing.
fn load_config() -> anyhow::Result<configs::AppConfig> {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            cfg.normalize_and_validate()?;
            Ok(cfg)
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config()?;

    // DB connection pool sized from configuration
    let db = models::db::connect_with_config(&cfg.database).await?;

    // The token secret travels from configuration into the auth service
    // here; it exists nowhere else.
    let auth = Arc::new(AuthService::new(
        Arc::new(SeaOrmAuthRepository { db: db.clone() }),
        AuthConfig {
            jwt_secret: cfg.auth.jwt_secret.clone(),
            token_ttl_hours: cfg.auth.token_ttl_hours,
            password_algorithm: "argon2".to_string(),
        },
    ));
    let listings = Arc::new(ListingService::new(Arc::new(SeaOrmListingRepository { db })));

    let state = ServerState { auth, listings };

    // Build router
    let app: Router = routes::build_router(state, build_cors(), &cfg.debug);
    if cfg.debug.user_maintenance {
        tracing::warn!("user maintenance routes are mounted; do not run this configuration in production");
    }

    // Bind and serve
    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, "starting directory server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

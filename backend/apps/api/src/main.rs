//! LMS API server.
//!
//! Reads its settings from the environment (and `.env`), applies pending
//! migrations, then serves `/auth`, `/users` and the learning routes.
//! `anyhow` is confined to startup; request errors go through `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;

use auth::domain::repository::RefreshTokenRepository;
use auth::{AccessGate, AuthConfig, PgAuthRepository, auth_router, users_router};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use learning::{LearningConfig, PgLearningStore, learning_router};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "lms_api=debug,auth=debug,learning=debug,tower_http=debug";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// ============================================================================
// Settings
// ============================================================================

struct Settings {
    database_url: String,
    max_connections: u32,
    bind_addr: SocketAddr,
    frontend_origins: Vec<HeaderValue>,
    auth: AuthConfig,
}

impl Settings {
    fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()?;

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        let auth = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => AuthConfig::with_secret(secret.into_bytes()),
            _ if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, signing with a random secret");
                AuthConfig::development()
            }
            _ => anyhow::bail!("JWT_SECRET must be set in release builds"),
        };

        Ok(Self {
            database_url,
            max_connections,
            bind_addr,
            frontend_origins,
            auth,
        })
    }
}

// ============================================================================
// Startup
// ============================================================================

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;
    tracing::info!(max_connections = settings.max_connections, "Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;
    tracing::info!("Migrations completed");

    Ok(pool)
}

/// Expired refresh tokens are dead weight; a failure here is not fatal.
async fn purge_expired_refresh_tokens(repo: &PgAuthRepository) {
    match repo.cleanup_expired().await {
        Ok(deleted) => tracing::info!(tokens_deleted = deleted, "Refresh token cleanup completed"),
        Err(e) => tracing::warn!(error = %e, "Refresh token cleanup failed, continuing anyway"),
    }
}

fn cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

fn build_app(pool: PgPool, auth_config: AuthConfig, origins: Vec<HeaderValue>) -> Router {
    let auth_repo = PgAuthRepository::new(pool.clone());
    let gate = AccessGate::from_config(&auth_config);

    Router::new()
        .nest("/auth", auth_router(auth_repo.clone(), auth_config.clone()))
        .nest("/users", users_router(auth_repo, auth_config))
        .merge(learning_router(
            PgLearningStore::new(pool),
            LearningConfig::default(),
            gate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(origins))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = Settings::from_env()?;
    let pool = connect(&settings).await?;
    purge_expired_refresh_tokens(&PgAuthRepository::new(pool.clone())).await;

    let bind_addr = settings.bind_addr;
    let app = build_app(pool, settings.auth, settings.frontend_origins);

    tracing::info!(%bind_addr, "Listening");
    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

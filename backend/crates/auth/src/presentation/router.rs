//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountRepository, RefreshTokenRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AccessGate, require_access_token};

/// Create the Auth router with PostgreSQL repository
///
/// Mounted under `/auth`: login and refresh are public, logout and verify
/// require an access token.
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let gate = AccessGate::from_config(&config);
    let state = AuthAppState::new(repo, config);

    let protected = Router::new()
        .route("/verify", get(handlers::verify))
        .route("/logout", post(handlers::logout::<R>))
        .route_layer(middleware::from_fn_with_state(gate, require_access_token));

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .merge(protected)
        .with_state(state)
}

/// Create the account administration router with PostgreSQL repository
///
/// Mounted under `/users`; every route requires an access token.
pub fn users_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    users_router_generic(repo, config)
}

/// Create a generic account administration router
pub fn users_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let gate = AccessGate::from_config(&config);
    let state = AuthAppState::new(repo, config);

    Router::new()
        .route(
            "/",
            get(handlers::list_accounts::<R>).post(handlers::create_account::<R>),
        )
        .route(
            "/{id}",
            get(handlers::get_account::<R>)
                .put(handlers::update_account::<R>)
                .delete(handlers::delete_account::<R>),
        )
        .route_layer(middleware::from_fn_with_state(gate, require_access_token))
        .with_state(state)
}

//! Auth Middleware
//!
//! Authorization Gate: bearer token validation before any handler runs,
//! and the [`Caller`] extractor handlers use for role checks.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::Request;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use platform::bearer::extract_bearer;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::domain::entity::{AccessClaims, Caller};
use crate::error::{AuthError, AuthResult};

/// Middleware state: validates access tokens
#[derive(Clone)]
pub struct AccessGate {
    tokens: Arc<TokenService>,
}

impl AccessGate {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Gate validating tokens signed with `config`'s secret
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(Arc::new(TokenService::new(config)))
    }

    /// Validate the bearer credential of a request
    pub fn authenticate(&self, headers: &axum::http::HeaderMap) -> AuthResult<AccessClaims> {
        let token = extract_bearer(headers).ok_or(AuthError::TokenMissing)?;
        self.tokens.validate(token)
    }
}

/// Middleware that requires a valid access token
///
/// On success the validated [`AccessClaims`] and the derived [`Caller`] are
/// stored in request extensions.
pub async fn require_access_token(
    State(gate): State<AccessGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = gate.authenticate(req.headers())?;

    req.extensions_mut().insert(Caller::from(claims.clone()));
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Route not behind `require_access_token`
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .ok_or(AuthError::TokenMissing)
    }
}

//! Sign Out Use Case
//!
//! Revokes a refresh token. Idempotent: an absent or unknown token is
//! "nothing to revoke", not an error.

use std::sync::Arc;

use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;

/// Sign out use case
pub struct SignOutUseCase<T>
where
    T: RefreshTokenRepository,
{
    token_repo: Arc<T>,
}

impl<T> SignOutUseCase<T>
where
    T: RefreshTokenRepository,
{
    pub fn new(token_repo: Arc<T>) -> Self {
        Self { token_repo }
    }

    /// Returns how many stored tokens were newly revoked
    pub async fn execute(&self, refresh_token: Option<&str>) -> AuthResult<u64> {
        let Some(token) = refresh_token.filter(|t| !t.trim().is_empty()) else {
            return Ok(0);
        };

        let revoked = self
            .token_repo
            .revoke_by_hash(&platform::crypto::token_digest(token))
            .await?;

        tracing::info!(revoked = revoked, "Refresh token revoked");
        Ok(revoked)
    }
}

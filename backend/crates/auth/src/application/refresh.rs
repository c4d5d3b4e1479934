//! Refresh Access Token Use Case
//!
//! Exchanges a live refresh token for a new access token built from the
//! account's current state. The refresh token itself is not rotated.

use std::sync::Arc;

use chrono::Utc;

use crate::application::token::{IssuedAccessToken, TokenService};
use crate::domain::entity::Account;
use crate::domain::repository::{AccountRepository, RefreshTokenRepository};
use crate::error::{AuthError, AuthResult};

pub struct RefreshOutput {
    pub access_token: IssuedAccessToken,
    pub account: Account,
    /// Same opaque token that was presented
    pub refresh_token: String,
}

pub struct RefreshAccessTokenUseCase<A, T>
where
    A: AccountRepository,
    T: RefreshTokenRepository,
{
    account_repo: Arc<A>,
    token_repo: Arc<T>,
    tokens: Arc<TokenService>,
}

impl<A, T> RefreshAccessTokenUseCase<A, T>
where
    A: AccountRepository,
    T: RefreshTokenRepository,
{
    pub fn new(account_repo: Arc<A>, token_repo: Arc<T>, tokens: Arc<TokenService>) -> Self {
        Self {
            account_repo,
            token_repo,
            tokens,
        }
    }

    pub async fn execute(&self, refresh_token: Option<String>) -> AuthResult<RefreshOutput> {
        let refresh_token = refresh_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::RefreshTokenMissing)?;

        let stored = self
            .token_repo
            .find_by_hash(&platform::crypto::token_digest(&refresh_token))
            .await?
            .ok_or(AuthError::RefreshTokenInvalid)?;

        stored.ensure_usable(Utc::now())?;

        // Owner deleted since issuance
        let account = self
            .account_repo
            .find_by_id(stored.account_id)
            .await?
            .ok_or(AuthError::RefreshTokenInvalid)?;

        let access_token = self.tokens.issue(&account)?;

        tracing::debug!(account_id = %account.id, "Access token refreshed");

        Ok(RefreshOutput {
            access_token,
            account,
            refresh_token,
        })
    }
}

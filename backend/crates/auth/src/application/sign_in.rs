//! Sign In Use Case
//!
//! Authenticates an account by enrollment id + secret and issues tokens.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::{IssuedAccessToken, TokenService};
use crate::domain::entity::{Account, RefreshToken};
use crate::domain::repository::{AccountRepository, RefreshTokenRepository};
use crate::domain::value_object::{EnrollmentId, RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub enrollment_id: Option<String>,
    pub password: Option<String>,
    /// Issue a refresh token as well ("manterSessao")
    pub keep_session: bool,
}

/// A refresh token handed to the client
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub access_token: IssuedAccessToken,
    pub account: Account,
    pub refresh_token: Option<IssuedRefreshToken>,
}

/// Sign in use case
pub struct SignInUseCase<A, T>
where
    A: AccountRepository,
    T: RefreshTokenRepository,
{
    account_repo: Arc<A>,
    token_repo: Arc<T>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<A, T> SignInUseCase<A, T>
where
    A: AccountRepository,
    T: RefreshTokenRepository,
{
    pub fn new(
        account_repo: Arc<A>,
        token_repo: Arc<T>,
        tokens: Arc<TokenService>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            account_repo,
            token_repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let (Some(enrollment_id), Some(password)) = (
            input.enrollment_id.filter(|s| !s.trim().is_empty()),
            input.password.filter(|s| !s.is_empty()),
        ) else {
            return Err(AuthError::MissingCredentials);
        };

        // Malformed ids cannot exist in storage; report them like unknown ones
        let enrollment_id =
            EnrollmentId::new(&enrollment_id).map_err(|_| AuthError::InvalidCredentials)?;
        let password = RawPassword::for_login(password);

        let account = self
            .account_repo
            .find_by_enrollment_id(&enrollment_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.password_hash.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&account)?;

        let refresh_token = if input.keep_session {
            let (entity, plaintext) = RefreshToken::issue(
                account.id,
                self.config.refresh_token_ttl_chrono(),
                self.config.refresh_token_bytes,
            );
            self.token_repo.create(&entity).await?;
            Some(IssuedRefreshToken {
                token: plaintext,
                expires_at: entity.expires_at,
            })
        } else {
            None
        };

        tracing::info!(
            account_id = %account.id,
            keep_session = input.keep_session,
            "Account signed in"
        );

        Ok(SignInOutput {
            access_token,
            account,
            refresh_token,
        })
    }
}

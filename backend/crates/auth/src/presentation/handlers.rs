//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use kernel::extract::{ApiJson, ApiPath};
use kernel::id::AccountId;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AccountQueryUseCase, CreateAccountInput, CreateAccountUseCase, DeleteAccountUseCase,
    RefreshAccessTokenUseCase, SignInInput, SignInUseCase, SignOutUseCase, TokenService,
    UpdateAccountInput, UpdateAccountUseCase,
};
use crate::domain::entity::{AccessClaims, Caller};
use crate::domain::repository::{AccountRepository, RefreshTokenRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    AccountResponse, AccountSummary, CreateAccountRequest, LoginRequest, LoginResponse,
    MessageResponse, RefreshResponse, RefreshTokenRequest, UpdateAccountRequest, VerifyResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

impl<R> AuthAppState<R>
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            tokens: Arc::new(TokenService::new(&config)),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            enrollment_id: req.matricula,
            password: req.senha,
            keep_session: req.manter_sessao,
        })
        .await?;

    let with_refresh = output.refresh_token.is_some();

    Ok(Json(LoginResponse {
        token: output.access_token.token,
        usuario: AccountSummary::from(&output.account),
        refresh_token: output.refresh_token.map(|r| r.token),
        token_expiry: with_refresh.then(|| state.config.access_token_ttl_label()),
        refresh_token_expiry: with_refresh.then(|| state.config.refresh_token_ttl_label()),
    }))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    ApiJson(req): ApiJson<RefreshTokenRequest>,
) -> AuthResult<Json<RefreshResponse>>
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = RefreshAccessTokenUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.tokens.clone(),
    );

    let output = use_case.execute(req.refresh_token).await?;

    Ok(Json(RefreshResponse {
        token: output.access_token.token,
        usuario: AccountSummary::from(&output.account),
        refresh_token: output.refresh_token,
        token_expiry: state.config.access_token_ttl_label(),
    }))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /auth/logout
///
/// The body is optional; a client without a refresh token only discards
/// its access token locally.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    body: Bytes,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let req: RefreshTokenRequest = serde_json::from_slice(&body).unwrap_or_default();

    let use_case = SignOutUseCase::new(state.repo.clone());
    use_case.execute(req.refresh_token.as_deref()).await?;

    Ok(Json(MessageResponse::new("Logout realizado com sucesso")))
}

// ============================================================================
// Verify
// ============================================================================

/// GET /auth/verify
pub async fn verify(Extension(claims): Extension<AccessClaims>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        autenticado: true,
        usuario: claims,
    })
}

// ============================================================================
// Accounts
// ============================================================================

/// GET /users
pub async fn list_accounts<R>(
    State(state): State<AuthAppState<R>>,
    caller: Caller,
) -> AuthResult<Json<Vec<AccountResponse>>>
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    caller.require_elevated()?;

    let accounts = AccountQueryUseCase::new(state.repo.clone()).list().await?;
    Ok(Json(accounts.iter().map(AccountResponse::from).collect()))
}

/// GET /users/{id}
pub async fn get_account<R>(
    State(state): State<AuthAppState<R>>,
    caller: Caller,
    ApiPath(id): ApiPath<AccountId>,
) -> AuthResult<Json<AccountResponse>>
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    caller.require_self_or_elevated(id)?;

    let account = AccountQueryUseCase::new(state.repo.clone()).get(id).await?;
    Ok(Json(AccountResponse::from(&account)))
}

/// POST /users
pub async fn create_account<R>(
    State(state): State<AuthAppState<R>>,
    caller: Caller,
    ApiJson(req): ApiJson<CreateAccountRequest>,
) -> AuthResult<(StatusCode, Json<AccountResponse>)>
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    caller.require_elevated()?;

    let account = CreateAccountUseCase::new(state.repo.clone())
        .execute(CreateAccountInput {
            name: req.nome,
            enrollment_id: req.matricula,
            password: req.senha,
            sector: req.setor,
            role: req.autoridade,
            manager_id: req.gestor_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// PUT /users/{id}
pub async fn update_account<R>(
    State(state): State<AuthAppState<R>>,
    caller: Caller,
    ApiPath(id): ApiPath<AccountId>,
    ApiJson(req): ApiJson<UpdateAccountRequest>,
) -> AuthResult<Json<AccountResponse>>
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    caller.require_self_or_elevated(id)?;

    let account = UpdateAccountUseCase::new(state.repo.clone())
        .execute(
            &caller,
            id,
            UpdateAccountInput {
                name: req.nome,
                sector: req.setor,
                password: req.senha,
                enrollment_id: req.matricula,
                role: req.autoridade,
                manager_id: req.gestor_id,
            },
        )
        .await?;

    Ok(Json(AccountResponse::from(&account)))
}

/// DELETE /users/{id}
pub async fn delete_account<R>(
    State(state): State<AuthAppState<R>>,
    caller: Caller,
    ApiPath(id): ApiPath<AccountId>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    caller.require_elevated()?;

    DeleteAccountUseCase::new(state.repo.clone())
        .execute(id)
        .await?;

    Ok(Json(MessageResponse::new("Usuário excluído com sucesso")))
}

//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Display messages are the user-facing texts sent in `{ "error": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login body without enrollment id or secret
    #[error("Matrícula e senha são obrigatórios")]
    MissingCredentials,

    /// Unknown enrollment id or wrong secret (deliberately indistinguishable)
    #[error("Matrícula ou senha inválida")]
    InvalidCredentials,

    /// No bearer credential on a protected route
    #[error("Token não fornecido")]
    TokenMissing,

    #[error("Token expirado")]
    TokenExpired,

    #[error("Token inválido")]
    TokenInvalid,

    #[error("Refresh token não fornecido")]
    RefreshTokenMissing,

    #[error("Refresh token inválido")]
    RefreshTokenInvalid,

    #[error("Refresh token revogado")]
    RefreshTokenRevoked,

    #[error("Refresh token expirado")]
    RefreshTokenExpired,

    /// Caller role is not in the handler's allowed set
    #[error("Acesso não autorizado. Você não tem permissão para esta ação.")]
    Forbidden,

    /// Caller is neither the profile owner nor elevated
    #[error("Não autorizado a acessar este perfil")]
    ProfileForbidden,

    #[error("Usuário não encontrado")]
    AccountNotFound,

    #[error("Matrícula já cadastrada")]
    EnrollmentIdTaken,

    /// Input validation failure with a user-facing message
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingCredentials
            | AuthError::RefreshTokenMissing
            | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::TokenMissing
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::RefreshTokenInvalid
            | AuthError::RefreshTokenRevoked
            | AuthError::RefreshTokenExpired => ErrorKind::Unauthorized,
            AuthError::Forbidden | AuthError::ProfileForbidden => ErrorKind::Forbidden,
            AuthError::AccountNotFound => ErrorKind::NotFound,
            AuthError::EnrollmentIdTaken => ErrorKind::Conflict,
            AuthError::Database(e) => database_error_kind(e),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Database(e) if !self.kind().is_server_error() => {
                AppError::new(self.kind(), constraint_message(e))
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::RefreshTokenRevoked => {
                tracing::warn!("Revoked refresh token presented");
            }
            AuthError::Forbidden | AuthError::ProfileForbidden => {
                tracing::warn!(error = %self, "Authorization denied");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

/// Classify a sqlx error: integrity violations are client conflicts, the rest is unexpected
pub fn database_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            ErrorKind::Conflict
        }
        _ => ErrorKind::InternalServerError,
    }
}

/// User-facing message for integrity violations
pub fn constraint_message(err: &sqlx::Error) -> &'static str {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => "Registro duplicado",
        _ => "Não é possível concluir a operação: existem registros relacionados",
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_owned()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<kernel::id::ParseIdError> for AuthError {
    fn from(err: kernel::id::ParseIdError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

//! Learning Error Types
//!
//! Curriculum, assessment, reward and certificate failures, mapped onto the
//! unified `kernel::error::AppError` taxonomy.
//!
//! Display messages are the user-facing texts sent in `{ "error": ... }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use auth::AuthError;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::RedemptionStatus;

/// Learning-specific result type alias
pub type LearningResult<T> = Result<T, LearningError>;

#[derive(Debug, Error)]
pub enum LearningError {
    /// Referenced entity absent; carries the full message ("Módulo não encontrado")
    #[error("{0}")]
    NotFound(&'static str),

    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Delete refused because dependent rows exist
    #[error("{0}")]
    HasDependents(&'static str),

    /// Integrity conflict reported by the store
    #[error("{0}")]
    Conflict(&'static str),

    #[error("É necessário responder todas as questões da avaliação")]
    IncompleteSubmission,

    #[error("Não é possível excluir, uma questão precisa ter pelo menos duas alternativas")]
    AlternativeFloor,

    #[error("Já existe uma etapa com esta ordem neste desafio")]
    DuplicateStageOrder,

    #[error("Recompensa esgotada")]
    RewardExhausted,

    #[error("Moedas insuficientes")]
    InsufficientCoins { balance: i64, cost: i64 },

    #[error("Status inválido")]
    InvalidStatus,

    #[error("Resgate cancelado não pode mudar de status")]
    RedemptionClosed,

    #[error("Usuário não concluiu esta trilha ainda")]
    TrailNotCompleted,

    #[error("Acesso não autorizado a este certificado")]
    CertificateForbidden,

    /// Authentication / authorization failure from the gate
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LearningError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LearningError::NotFound(_) => ErrorKind::NotFound,
            LearningError::Validation(_)
            | LearningError::HasDependents(_)
            | LearningError::IncompleteSubmission
            | LearningError::AlternativeFloor
            | LearningError::DuplicateStageOrder
            | LearningError::RewardExhausted
            | LearningError::InsufficientCoins { .. }
            | LearningError::InvalidStatus
            | LearningError::RedemptionClosed
            | LearningError::TrailNotCompleted => ErrorKind::BadRequest,
            LearningError::CertificateForbidden => ErrorKind::Forbidden,
            LearningError::Conflict(_) => ErrorKind::Conflict,
            LearningError::Auth(e) => e.kind(),
            LearningError::Database(e) => auth::error::database_error_kind(e),
            LearningError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            LearningError::InsufficientCoins { balance, cost } => {
                AppError::new(self.kind(), self.to_string())
                    .with_detail("moedasUsuario", balance)
                    .with_detail("moedasNecessarias", cost)
            }
            LearningError::InvalidStatus => AppError::new(self.kind(), self.to_string())
                .with_detail("statusValidos", RedemptionStatus::codes()),
            LearningError::Auth(e) => e.to_app_error(),
            LearningError::Database(e) if !self.kind().is_server_error() => {
                AppError::new(self.kind(), auth::error::constraint_message(e))
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            LearningError::Database(e) if self.kind().is_server_error() => {
                tracing::error!(error = %e, "Learning database error");
            }
            LearningError::Internal(msg) => {
                tracing::error!(message = %msg, "Learning internal error");
            }
            LearningError::Auth(e) if e.kind() == ErrorKind::Forbidden => {
                tracing::warn!(error = %e, "Authorization denied");
            }
            LearningError::CertificateForbidden => {
                tracing::warn!("Certificate access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Learning error");
            }
        }
    }
}

impl IntoResponse for LearningError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for LearningError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => LearningError::Validation(err.message().to_owned()),
            _ => LearningError::Internal(err.to_string()),
        }
    }
}

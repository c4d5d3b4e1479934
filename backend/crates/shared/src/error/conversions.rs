//! `From` impls into [`AppError`] for the libraries the services touch, and
//! the JSON rendering of [`AppError`] when the `axum` feature is on.

use super::app_error::AppError;
use crate::id::ParseIdError;

/// Message sent for every 5xx; the cause stays in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor";

// ============================================================================
// Identifiers and JSON
// ============================================================================

impl From<ParseIdError> for AppError {
    fn from(err: ParseIdError) -> Self {
        AppError::bad_request(err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request("Corpo da requisição inválido").with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let mapped = match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Registro não encontrado"),
            // SQLSTATE classes: 23 integrity, 40 rollback
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => AppError::conflict("Registro duplicado"),
                Some("23503") => AppError::conflict(
                    "Não é possível concluir a operação: existem registros relacionados",
                ),
                Some("23502" | "23514") => AppError::bad_request("Dados inválidos"),
                Some("40001" | "40P01") => {
                    AppError::conflict("Operação concorrente, tente novamente")
                }
                _ => AppError::internal("Database error"),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                AppError::internal("Database unavailable")
            }
            _ => AppError::internal("Database error"),
        };
        mapped.with_source(err)
    }
}

// ============================================================================
// HTTP rendering
// ============================================================================

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::bad_request("Corpo da requisição inválido").with_detail("detalhe", rejection.body_text())
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        AppError::bad_request("ID inválido").with_detail("detalhe", rejection.body_text())
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // { "error": <message>, ...details }
        let mut body = serde_json::Map::new();
        let message = if self.is_server_error() {
            INTERNAL_ERROR_MESSAGE
        } else {
            self.message()
        };
        body.insert("error".to_owned(), serde_json::Value::from(message));
        if !self.is_server_error() {
            for (key, value) in self.details() {
                body.insert(key.to_string(), value.clone());
            }
        }

        (status, Json(serde_json::Value::Object(body))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[cfg(feature = "sqlx")]
    #[test]
    fn missing_row_is_not_found() {
        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn malformed_id_is_bad_request() {
        let parsed: Result<crate::id::AccountId, _> = "not-a-uuid".parse();
        let app_err: AppError = parsed.unwrap_err().into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
        assert_eq!(app_err.message(), "ID inválido");
    }

    #[test]
    fn malformed_json_is_bad_request() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[cfg(feature = "axum")]
    #[tokio::test]
    async fn details_are_flattened_beside_error() {
        use axum::response::IntoResponse;

        let response = AppError::bad_request("Moedas insuficientes")
            .with_detail("moedasUsuario", 10)
            .with_detail("moedasNecessarias", 50)
            .into_response();
        assert_eq!(response.status().as_u16(), 400);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "error": "Moedas insuficientes",
                "moedasUsuario": 10,
                "moedasNecessarias": 50,
            })
        );
    }

    #[cfg(feature = "axum")]
    #[tokio::test]
    async fn server_error_hides_message_and_details() {
        use axum::response::IntoResponse;

        let response = AppError::internal("connection reset by peer")
            .with_detail("query", "SELECT 1")
            .into_response();
        assert_eq!(response.status().as_u16(), 500);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": INTERNAL_ERROR_MESSAGE }));
    }
}

//! API DTOs (Data Transfer Objects)
//!
//! Field names follow the public JSON contract (Portuguese, mixed case).

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::{AccessClaims, Account};
use crate::domain::value_object::Role;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub matricula: Option<String>,
    pub senha: Option<String>,
    #[serde(rename = "manterSessao", default)]
    pub manter_sessao: bool,
}

/// Minimal account view embedded in token responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub nome: String,
    pub matricula: String,
    pub autoridade: Role,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            nome: account.name.clone(),
            matricula: account.enrollment_id.to_string(),
            autoridade: account.role,
        }
    }
}

/// Login response; refresh fields appear only with `manterSessao`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub usuario: AccountSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_expiry: Option<String>,
}

// ============================================================================
// Refresh / Logout
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    pub usuario: AccountSummary,
    pub refresh_token: String,
    pub token_expiry: String,
}

/// Generic `{ message }` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub autenticado: bool,
    pub usuario: AccessClaims,
}

// ============================================================================
// Accounts
// ============================================================================

/// Full account view (never includes the secret hash)
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: AccountId,
    pub nome: String,
    pub matricula: String,
    pub setor: String,
    pub autoridade: Role,
    pub pontos: i64,
    pub gestor_id: Option<AccountId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            nome: account.name.clone(),
            matricula: account.enrollment_id.to_string(),
            setor: account.sector.clone(),
            autoridade: account.role,
            pontos: account.points,
            gestor_id: account.manager_id,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAccountRequest {
    pub nome: Option<String>,
    pub matricula: Option<String>,
    pub senha: Option<String>,
    pub setor: Option<String>,
    pub autoridade: Option<Role>,
    pub gestor_id: Option<AccountId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub nome: Option<String>,
    pub matricula: Option<String>,
    pub senha: Option<String>,
    pub setor: Option<String>,
    pub autoridade: Option<Role>,
    pub gestor_id: Option<AccountId>,
}

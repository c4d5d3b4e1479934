//! Access Token Service
//!
//! HS256 JWT issue/validate. Expired and otherwise-invalid tokens are
//! reported as distinct errors so clients can re-authenticate vs give up.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::application::config::AuthConfig;
use crate::domain::entity::{AccessClaims, Account};
use crate::error::{AuthError, AuthResult};

/// A freshly signed access token
#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.clock_skew_leeway.as_secs();

        Self {
            encoding_key: EncodingKey::from_secret(&config.jwt_secret),
            decoding_key: DecodingKey::from_secret(&config.jwt_secret),
            validation,
            ttl_secs: config.access_token_ttl_secs(),
        }
    }

    /// Issue an access token from the account's current state
    pub fn issue(&self, account: &Account) -> AuthResult<IssuedAccessToken> {
        self.issue_at(account, Utc::now())
    }

    /// Issue as if the current time were `now`
    pub fn issue_at(&self, account: &Account, now: DateTime<Utc>) -> AuthResult<IssuedAccessToken> {
        let expires_at = now + chrono::Duration::seconds(self.ttl_secs);
        let claims = AccessClaims {
            id: account.id,
            matricula: account.enrollment_id.to_string(),
            nome: account.name.clone(),
            autoridade: account.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign access token: {}", e)))?;

        Ok(IssuedAccessToken { token, expires_at })
    }

    /// Verify signature and expiry
    pub fn validate(&self, token: &str) -> AuthResult<AccessClaims> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{AccountPassword, EnrollmentId, RawPassword, Role};

    fn account() -> Account {
        let raw = RawPassword::new("senha123".to_string()).unwrap();
        Account::new(
            "Ana Souza".to_string(),
            EnrollmentId::new("A100").unwrap(),
            AccountPassword::from_raw(&raw).unwrap(),
            "TI".to_string(),
            Role::Manager,
            None,
        )
    }

    #[test]
    fn test_issue_and_validate() {
        let service = TokenService::new(&AuthConfig::with_secret(b"k".repeat(32)));
        let account = account();

        let issued = service.issue(&account).unwrap();
        let claims = service.validate(&issued.token).unwrap();

        assert_eq!(claims.id, account.id);
        assert_eq!(claims.matricula, "A100");
        assert_eq!(claims.nome, "Ana Souza");
        assert_eq!(claims.autoridade, Role::Manager);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_is_distinct_from_invalid() {
        let service = TokenService::new(&AuthConfig::with_secret(b"k".repeat(32)));
        let two_hours_ago = Utc::now() - chrono::Duration::hours(2);
        let issued = service.issue_at(&account(), two_hours_ago).unwrap();

        assert!(matches!(
            service.validate(&issued.token),
            Err(AuthError::TokenExpired)
        ));
        assert!(matches!(
            service.validate("not.a.jwt"),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_foreign_signature_is_invalid() {
        let ours = TokenService::new(&AuthConfig::with_secret(b"a".repeat(32)));
        let theirs = TokenService::new(&AuthConfig::with_secret(b"b".repeat(32)));
        let issued = theirs.issue(&account()).unwrap();

        assert!(matches!(
            ours.validate(&issued.token),
            Err(AuthError::TokenInvalid)
        ));
    }
}

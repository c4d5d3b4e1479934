//! Refresh Token Entity
//!
//! Opaque long-lived credential. Only the SHA-256 digest is persisted.
//!
//! ```text
//! issued ──revoke──▶ revoked   (terminal)
//!    └────time────▶ expired   (terminal, never stored)
//! ```

use chrono::{DateTime, Duration, Utc};
use kernel::id::{AccountId, RefreshTokenId};

use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub account_id: AccountId,
    /// SHA-256 of the opaque token
    pub token_hash: Vec<u8>,
    pub expires_at: DateTime<Utc>,
    /// Monotonic: once true, never reset
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Issue a new token for `account_id`
    ///
    /// Returns the entity to persist and the plaintext to hand to the client.
    pub fn issue(account_id: AccountId, ttl: Duration, entropy_bytes: usize) -> (Self, String) {
        let plaintext = platform::crypto::random_token_hex(entropy_bytes);
        let now = Utc::now();
        let token = Self {
            id: RefreshTokenId::new(),
            account_id,
            token_hash: platform::crypto::token_digest(&plaintext),
            expires_at: now + ttl,
            revoked: false,
            created_at: now,
        };
        (token, plaintext)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Ensure the token may still produce access tokens
    ///
    /// Revocation is checked first: a revoked token reports as revoked even
    /// after it has also expired.
    pub fn ensure_usable(&self, now: DateTime<Utc>) -> AuthResult<()> {
        if self.revoked {
            return Err(AuthError::RefreshTokenRevoked);
        }
        if self.is_expired_at(now) {
            return Err(AuthError::RefreshTokenExpired);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue() {
        let account = AccountId::new();
        let (token, plaintext) = RefreshToken::issue(account, Duration::days(30), 40);

        assert_eq!(plaintext.len(), 80);
        assert_eq!(token.token_hash, platform::crypto::token_digest(&plaintext));
        assert_eq!(token.account_id, account);
        assert!(!token.revoked);
        assert!(token.ensure_usable(Utc::now()).is_ok());
    }

    #[test]
    fn test_expired() {
        let (token, _) = RefreshToken::issue(AccountId::new(), Duration::days(30), 40);
        let later = token.expires_at + Duration::seconds(1);
        assert!(matches!(
            token.ensure_usable(later),
            Err(AuthError::RefreshTokenExpired)
        ));
    }

    #[test]
    fn test_revoked_wins_over_expired() {
        let (mut token, _) = RefreshToken::issue(AccountId::new(), Duration::days(30), 40);
        token.revoked = true;
        let later = token.expires_at + Duration::days(1);
        assert!(matches!(
            token.ensure_usable(later),
            Err(AuthError::RefreshTokenRevoked)
        ));
    }
}

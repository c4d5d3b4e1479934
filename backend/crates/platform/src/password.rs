//! Argon2id password storage.
//!
//! Input is NFKC-normalized before it is hashed or verified, so a password
//! typed with fullwidth or composed characters verifies against the same hash.
//! Clear text is zeroized on drop and never printed.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Rejection of a password that is about to be stored.
///
/// The messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("A senha não pode ser vazia")]
    Blank,
    #[error("A senha deve ter pelo menos {} caracteres", MIN_PASSWORD_LENGTH)]
    TooShort(usize),
    #[error("A senha deve ter no máximo {} caracteres", MAX_PASSWORD_LENGTH)]
    TooLong(usize),
    #[error("A senha contém caracteres inválidos")]
    ControlCharacter,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("stored password hash is not a PHC string")]
    Malformed,
}

fn normalize(raw: &str) -> String {
    raw.nfkc().collect()
}

fn check_policy(normalized: &str) -> Result<(), PasswordPolicyError> {
    if normalized.trim().is_empty() {
        return Err(PasswordPolicyError::Blank);
    }
    // code points, not bytes
    match normalized.chars().count() {
        n if n < MIN_PASSWORD_LENGTH => Err(PasswordPolicyError::TooShort(n)),
        n if n > MAX_PASSWORD_LENGTH => Err(PasswordPolicyError::TooLong(n)),
        _ if normalized.chars().any(char::is_control) => {
            Err(PasswordPolicyError::ControlCharacter)
        }
        _ => Ok(()),
    }
}

// ============================================================================
// Clear text
// ============================================================================

/// A password as typed by the user. Not `Clone`.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("senha-forte".to_string()).unwrap();
/// let stored = password.hash().unwrap();
/// assert!(stored.verify(&ClearTextPassword::for_verification("senha-forte".into())));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Password chosen at account creation or reset; the length and
    /// character policy applies.
    pub fn new(mut raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized = normalize(&raw);
        raw.zeroize();
        check_policy(&normalized)?;
        Ok(Self(normalized))
    }

    /// Login attempt. No policy, so a short input fails like any wrong one.
    pub fn for_verification(mut raw: String) -> Self {
        let normalized = normalize(&raw);
        raw.zeroize();
        Self(normalized)
    }

    pub fn hash(&self) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        // argon2 defaults: Argon2id, m=19 MiB, t=2, p=1
        Argon2::default()
            .hash_password(self.0.as_bytes(), &salt)
            .map(|phc| HashedPassword(phc.to_string()))
            .map_err(|e| PasswordHashError::Hashing(e.to_string()))
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

// ============================================================================
// Stored hash
// ============================================================================

/// PHC string as kept in `accounts.password_hash`.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::Malformed)?;
        Ok(Self(phc))
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    /// Constant-time check; a hash that no longer parses verifies nothing.
    pub fn verify(&self, attempt: &ClearTextPassword) -> bool {
        PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(attempt.0.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_rejections() {
        let cases = [
            ("abc".to_string(), PasswordPolicyError::TooShort(3)),
            ("a".repeat(MAX_PASSWORD_LENGTH + 1), PasswordPolicyError::TooLong(129)),
            ("        ".to_string(), PasswordPolicyError::Blank),
            ("senha\u{0007}123".to_string(), PasswordPolicyError::ControlCharacter),
        ];
        for (raw, expected) in cases {
            assert_eq!(ClearTextPassword::new(raw).unwrap_err(), expected);
        }
    }

    #[test]
    fn accented_password_is_accepted() {
        assert!(ClearTextPassword::new("ação-segura!".to_string()).is_ok());
    }

    #[test]
    fn short_message_names_the_minimum() {
        let err = ClearTextPassword::new("12".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "A senha deve ter pelo menos 6 caracteres");
    }

    #[test]
    fn wrong_or_short_attempts_do_not_verify() {
        let stored = ClearTextPassword::new("senha123".to_string())
            .unwrap()
            .hash()
            .unwrap();

        assert!(stored.verify(&ClearTextPassword::for_verification("senha123".into())));
        assert!(!stored.verify(&ClearTextPassword::for_verification("senha124".into())));
        assert!(!stored.verify(&ClearTextPassword::for_verification("x".into())));
    }

    #[test]
    fn fullwidth_input_verifies_against_ascii_hash() {
        let stored = ClearTextPassword::new("\u{FF41}bcdefg".to_string())
            .unwrap()
            .hash()
            .unwrap();
        assert!(stored.verify(&ClearTextPassword::for_verification("abcdefg".into())));
    }

    #[test]
    fn stored_hash_reloads_from_phc_string() {
        let password = ClearTextPassword::new("senha123".to_string()).unwrap();
        let stored = password.hash().unwrap();

        let reloaded = HashedPassword::from_phc_string(stored.as_phc_string()).unwrap();
        assert!(reloaded.verify(&password));
        assert!(HashedPassword::from_phc_string("plaintext").is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        let password = ClearTextPassword::for_verification("secret".to_string());
        let rendered = format!("{password:?}");
        assert!(!rendered.contains("secret"));
    }
}

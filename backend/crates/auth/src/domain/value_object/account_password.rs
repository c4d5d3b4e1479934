//! Account Password Value Object
//!
//! Domain wrapper over `platform::password`: policy failures become
//! user-facing validation errors, verification never leaks why it failed.

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Raw password from user input (zeroized on drop)
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password that will be stored; the policy applies
    pub fn new(raw: String) -> AuthResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| AuthError::Validation(e.to_string()))
    }

    /// Login attempt; never rejected by policy
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

/// Stored password hash (Argon2id PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct AccountPassword(HashedPassword);

impl AccountPassword {
    pub fn from_raw(raw: &RawPassword) -> AuthResult<Self> {
        raw.0.hash().map(Self).map_err(hash_error)
    }

    pub fn from_db(phc: String) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(hash_error)
    }

    pub fn verify(&self, raw: &RawPassword) -> bool {
        self.0.verify(&raw.0)
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for AccountPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccountPassword([HASH])")
    }
}

fn hash_error(err: PasswordHashError) -> AuthError {
    AuthError::Internal(err.to_string())
}

//! Authenticated caller
//!
//! Identity extracted from a validated access token, plus the two
//! authorization predicates handlers use.

use kernel::id::AccountId;
use serde::{Deserialize, Serialize};

use crate::domain::value_object::Role;
use crate::error::{AuthError, AuthResult};

/// Claims embedded in an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: AccountId,
    pub matricula: String,
    pub nome: String,
    pub autoridade: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: AccountId,
    pub enrollment_id: String,
    pub name: String,
    pub role: Role,
}

impl Caller {
    /// Role membership check
    pub fn require_role(&self, allowed: &[Role]) -> AuthResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// Shorthand for `require_role(Role::ELEVATED)`
    pub fn require_elevated(&self) -> AuthResult<()> {
        self.require_role(Role::ELEVATED)
    }

    /// Profile-shaped resources: the owner, or any manager/admin
    pub fn require_self_or_elevated(&self, owner: AccountId) -> AuthResult<()> {
        if self.id == owner || self.role.is_elevated() {
            Ok(())
        } else {
            Err(AuthError::ProfileForbidden)
        }
    }
}

impl From<AccessClaims> for Caller {
    fn from(claims: AccessClaims) -> Self {
        Self {
            id: claims.id,
            enrollment_id: claims.matricula,
            name: claims.nome,
            role: claims.autoridade,
        }
    }
}

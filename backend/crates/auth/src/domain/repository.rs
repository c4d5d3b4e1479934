//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::AccountId;

use crate::domain::entity::{Account, RefreshToken};
use crate::domain::value_object::EnrollmentId;
use crate::error::AuthResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Create a new account
    async fn create(&self, account: &Account) -> AuthResult<()>;

    /// Find account by ID
    async fn find_by_id(&self, id: AccountId) -> AuthResult<Option<Account>>;

    /// Find account by enrollment id
    async fn find_by_enrollment_id(&self, enrollment_id: &EnrollmentId)
    -> AuthResult<Option<Account>>;

    /// Check if enrollment id exists
    async fn exists_by_enrollment_id(&self, enrollment_id: &EnrollmentId) -> AuthResult<bool>;

    /// List all accounts ordered by name
    async fn list(&self) -> AuthResult<Vec<Account>>;

    /// Update profile fields (points are owned by the ledger and not written here)
    async fn update(&self, account: &Account) -> AuthResult<()>;

    /// Delete account; returns false when nothing was deleted
    async fn delete(&self, id: AccountId) -> AuthResult<bool>;
}

/// Refresh token repository trait
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    async fn create(&self, token: &RefreshToken) -> AuthResult<()>;

    async fn find_by_hash(&self, token_hash: &[u8]) -> AuthResult<Option<RefreshToken>>;

    /// Mark every token with this digest revoked; returns affected rows
    async fn revoke_by_hash(&self, token_hash: &[u8]) -> AuthResult<u64>;

    /// Delete tokens past expiry
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

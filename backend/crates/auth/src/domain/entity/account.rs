//! Account Entity
//!
//! Root entity of the system. Points are a cached running total of the
//! point ledger and are only changed through ledger postings.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{AccountPassword, EnrollmentId, Role};

#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    /// Display name
    pub name: String,
    pub enrollment_id: EnrollmentId,
    pub password_hash: AccountPassword,
    /// Department / sector
    pub sector: String,
    pub role: Role,
    /// Cached point balance (never negative)
    pub points: i64,
    /// Owning manager, if any
    pub manager_id: Option<AccountId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        name: String,
        enrollment_id: EnrollmentId,
        password_hash: AccountPassword,
        sector: String,
        role: Role,
        manager_id: Option<AccountId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            name,
            enrollment_id,
            password_hash,
            sector,
            role,
            points: 0,
            manager_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

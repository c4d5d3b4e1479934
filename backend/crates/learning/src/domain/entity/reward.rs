//! Reward Ledger entities

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, LedgerEntryId, RedemptionId, RewardId};
use uuid::Uuid;

use crate::domain::value_object::{LedgerEvent, RedemptionStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub id: RewardId,
    pub name: String,
    pub description: String,
    /// Coin cost, always positive
    pub cost: i64,
    pub kind: String,
    /// Remaining stock; `None` means unlimited
    pub quantity: Option<i64>,
    pub manager_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reward {
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        matches!(self.quantity, Some(q) if q <= 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redemption {
    pub id: RedemptionId,
    pub account_id: AccountId,
    pub reward_id: RewardId,
    pub redeemed_at: DateTime<Utc>,
    pub status: RedemptionStatus,
}

impl Redemption {
    pub fn request(account_id: AccountId, reward_id: RewardId) -> Self {
        Self {
            id: RedemptionId::new(),
            account_id,
            reward_id,
            redeemed_at: Utc::now(),
            status: RedemptionStatus::Requested,
        }
    }
}

/// Redemption with its reward, as listed to users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionDetail {
    pub redemption: Redemption,
    pub reward: Reward,
}

/// Immutable signed delta on a point or coin ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub account_id: AccountId,
    pub event: LedgerEvent,
    /// Id of the row that caused the entry (content, assessment, redemption, certificate)
    pub reference_id: Option<Uuid>,
    pub amount: i64,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(
        account_id: AccountId,
        event: LedgerEvent,
        reference_id: impl Into<Uuid>,
        amount: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: LedgerEntryId::new(),
            account_id,
            event,
            reference_id: Some(reference_id.into()),
            amount,
            description: description.into(),
            occurred_at: Utc::now(),
        }
    }
}

//! Reward Ledger Use Cases
//!
//! Reward catalog, coin balance, redemption and redemption status changes.
//!
//! Redemption and cancellation lock the account row and then the reward row
//! inside one transaction, so stock and balance checks cannot race.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{AccountId, RedemptionId, RewardId};

use super::non_blank;
use crate::domain::entity::{LedgerEntry, Redemption, RedemptionDetail, Reward};
use crate::domain::repository::{LearningStore, LearningTx};
use crate::domain::services::{self, StatusTransition};
use crate::domain::value_object::LedgerEvent;
use crate::error::{LearningError, LearningResult};

const REWARD_NOT_FOUND: &str = "Recompensa não encontrada";
const ACCOUNT_NOT_FOUND: &str = "Usuário não encontrado";

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Default)]
pub struct RewardInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cost: Option<i64>,
    pub kind: Option<String>,
    pub quantity: Option<i64>,
}

pub struct RewardUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> RewardUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> LearningResult<Vec<Reward>> {
        self.store.list_rewards().await
    }

    pub async fn get(&self, id: RewardId) -> LearningResult<Reward> {
        self.store
            .find_reward(id)
            .await?
            .ok_or(LearningError::NotFound(REWARD_NOT_FOUND))
    }

    pub async fn create(&self, manager_id: AccountId, input: RewardInput) -> LearningResult<Reward> {
        let (Some(name), Some(description), Some(cost), Some(kind)) = (
            non_blank(input.name),
            non_blank(input.description),
            input.cost,
            non_blank(input.kind),
        ) else {
            return Err(LearningError::Validation(
                "Nome, descrição, moedas requeridas e tipo são obrigatórios".to_string(),
            ));
        };
        validate_cost(cost)?;
        validate_quantity(input.quantity)?;

        let now = Utc::now();
        let reward = Reward {
            id: RewardId::new(),
            name,
            description,
            cost,
            kind,
            quantity: input.quantity,
            manager_id,
            created_at: now,
            updated_at: now,
        };
        self.store.create_reward(&reward).await?;

        tracing::info!(reward_id = %reward.id, cost = reward.cost, "Reward created");
        Ok(reward)
    }

    /// Edit catalog fields while holding the reward row lock
    pub async fn update(&self, id: RewardId, input: RewardInput) -> LearningResult<Reward> {
        let mut tx = self.store.begin().await?;
        let mut reward = tx
            .lock_reward(id)
            .await?
            .ok_or(LearningError::NotFound(REWARD_NOT_FOUND))?;

        if let Some(name) = non_blank(input.name) {
            reward.name = name;
        }
        if let Some(description) = non_blank(input.description) {
            reward.description = description;
        }
        if let Some(cost) = input.cost {
            validate_cost(cost)?;
            reward.cost = cost;
        }
        if let Some(kind) = non_blank(input.kind) {
            reward.kind = kind;
        }
        if input.quantity.is_some() {
            validate_quantity(input.quantity)?;
            reward.quantity = input.quantity;
        }

        reward.updated_at = Utc::now();
        tx.update_reward(&reward).await?;
        tx.commit().await?;

        tracing::info!(reward_id = %id, quantity = ?reward.quantity, "Reward updated");
        Ok(reward)
    }

    pub async fn delete(&self, id: RewardId) -> LearningResult<()> {
        self.get(id).await?;
        if self.store.reward_has_redemptions(id).await? {
            return Err(LearningError::HasDependents(
                "A recompensa não pode ser excluída porque possui resgates associados",
            ));
        }
        if !self.store.delete_reward(id).await? {
            return Err(LearningError::NotFound(REWARD_NOT_FOUND));
        }
        tracing::info!(reward_id = %id, "Reward deleted");
        Ok(())
    }
}

fn validate_cost(cost: i64) -> LearningResult<()> {
    if cost <= 0 {
        return Err(LearningError::Validation(
            "Moedas requeridas deve ser maior que zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_quantity(quantity: Option<i64>) -> LearningResult<()> {
    match quantity {
        Some(q) if q < 0 => Err(LearningError::Validation(
            "Quantidade não pode ser negativa".to_string(),
        )),
        _ => Ok(()),
    }
}

// ============================================================================
// Balance
// ============================================================================

/// Computed coin balance with the entries it was summed from
#[derive(Debug, Clone)]
pub struct CoinStatement {
    pub account_id: AccountId,
    pub balance: i64,
    pub history: Vec<LedgerEntry>,
}

pub struct CoinBalanceUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> CoinBalanceUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, account_id: AccountId) -> LearningResult<CoinStatement> {
        if !self.store.account_exists(account_id).await? {
            return Err(LearningError::NotFound(ACCOUNT_NOT_FOUND));
        }
        let balance = self.store.coin_balance(account_id).await?;
        let history = self.store.coin_history(account_id).await?;
        Ok(CoinStatement {
            account_id,
            balance,
            history,
        })
    }

    pub async fn redemptions(&self, account_id: AccountId) -> LearningResult<Vec<RedemptionDetail>> {
        if !self.store.account_exists(account_id).await? {
            return Err(LearningError::NotFound(ACCOUNT_NOT_FOUND));
        }
        self.store.account_redemptions(account_id).await
    }
}

// ============================================================================
// Redeem
// ============================================================================

pub struct RedeemRewardUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> RedeemRewardUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Debit the cost, create the redemption and take one unit of stock
    pub async fn execute(
        &self,
        account_id: AccountId,
        reward_id: RewardId,
    ) -> LearningResult<RedemptionDetail> {
        let mut tx = self.store.begin().await?;

        if !tx.lock_account(account_id).await? {
            return Err(LearningError::NotFound(ACCOUNT_NOT_FOUND));
        }
        let mut reward = tx
            .lock_reward(reward_id)
            .await?
            .ok_or(LearningError::NotFound(REWARD_NOT_FOUND))?;

        let balance = tx.coin_balance(account_id).await?;
        services::ensure_redeemable(&reward, balance)?;

        let redemption = Redemption::request(account_id, reward_id);
        tx.insert_redemption(&redemption).await?;

        let debit = LedgerEntry::new(
            account_id,
            LedgerEvent::RewardRedemption,
            redemption.id,
            -reward.cost,
            format!("Resgate da recompensa: {}", reward.name),
        );
        tx.append_coins(&debit).await?;

        if let Some(quantity) = reward.quantity {
            reward.quantity = Some(quantity - 1);
            tx.set_reward_quantity(reward_id, reward.quantity).await?;
        }

        tx.commit().await?;

        tracing::info!(
            account_id = %account_id,
            reward_id = %reward_id,
            redemption_id = %redemption.id,
            cost = reward.cost,
            "Reward redeemed"
        );
        Ok(RedemptionDetail { redemption, reward })
    }
}

// ============================================================================
// Status change
// ============================================================================

pub struct ChangeRedemptionStatusUseCase<S>
where
    S: LearningStore,
{
    store: Arc<S>,
}

impl<S> ChangeRedemptionStatusUseCase<S>
where
    S: LearningStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Move a redemption to `status`
    ///
    /// Entering `CANCELADO` refunds the cost and returns the unit of stock.
    /// A cancelled redemption never leaves `CANCELADO`, so the refund happens
    /// at most once.
    pub async fn execute(
        &self,
        id: RedemptionId,
        status: Option<&str>,
    ) -> LearningResult<RedemptionDetail> {
        let next = services::parse_status(status)?;

        let mut tx = self.store.begin().await?;
        let mut redemption = tx
            .lock_redemption(id)
            .await?
            .ok_or(LearningError::NotFound("Resgate não encontrado"))?;

        let transition = services::plan_status_change(redemption.status, next)?;
        if transition == StatusTransition::Cancel && !tx.lock_account(redemption.account_id).await? {
            return Err(LearningError::NotFound(ACCOUNT_NOT_FOUND));
        }
        let mut reward = tx
            .lock_reward(redemption.reward_id)
            .await?
            .ok_or(LearningError::NotFound(REWARD_NOT_FOUND))?;

        match transition {
            StatusTransition::Unchanged => {
                tracing::debug!(redemption_id = %id, status = %next, "Redemption status unchanged");
                return Ok(RedemptionDetail { redemption, reward });
            }
            StatusTransition::Update => {
                tx.update_redemption_status(id, next).await?;
            }
            StatusTransition::Cancel => {
                tx.update_redemption_status(id, next).await?;

                let refund = LedgerEntry::new(
                    redemption.account_id,
                    LedgerEvent::RewardRefund,
                    id,
                    reward.cost,
                    format!("Estorno do resgate da recompensa: {}", reward.name),
                );
                tx.append_coins(&refund).await?;

                if let Some(quantity) = reward.quantity {
                    reward.quantity = Some(quantity + 1);
                    tx.set_reward_quantity(reward.id, reward.quantity).await?;
                }
            }
        }
        tx.commit().await?;

        tracing::info!(
            redemption_id = %id,
            from = %redemption.status,
            to = %next,
            "Redemption status changed"
        );
        redemption.status = next;
        Ok(RedemptionDetail { redemption, reward })
    }
}

//! Account Administration Use Cases
//!
//! Profile CRUD. Authorization (role / self-or-elevated) is checked by the
//! caller of these use cases; field-level restrictions are checked here.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::domain::entity::{Account, Caller};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountPassword, EnrollmentId, RawPassword, Role};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Queries
// ============================================================================

pub struct AccountQueryUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
}

impl<A> AccountQueryUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>) -> Self {
        Self { account_repo }
    }

    pub async fn list(&self) -> AuthResult<Vec<Account>> {
        self.account_repo.list().await
    }

    pub async fn get(&self, id: AccountId) -> AuthResult<Account> {
        self.account_repo
            .find_by_id(id)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }
}

// ============================================================================
// Create
// ============================================================================

#[derive(Debug, Default)]
pub struct CreateAccountInput {
    pub name: Option<String>,
    pub enrollment_id: Option<String>,
    pub password: Option<String>,
    pub sector: Option<String>,
    pub role: Option<Role>,
    pub manager_id: Option<AccountId>,
}

pub struct CreateAccountUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
}

impl<A> CreateAccountUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>) -> Self {
        Self { account_repo }
    }

    pub async fn execute(&self, input: CreateAccountInput) -> AuthResult<Account> {
        let (Some(name), Some(enrollment_id), Some(password), Some(sector)) = (
            non_blank(input.name),
            non_blank(input.enrollment_id),
            input.password.filter(|p| !p.is_empty()),
            non_blank(input.sector),
        ) else {
            return Err(AuthError::Validation(
                "Nome, matrícula, senha e setor são obrigatórios".to_string(),
            ));
        };

        let enrollment_id = EnrollmentId::new(&enrollment_id)?;
        if self
            .account_repo
            .exists_by_enrollment_id(&enrollment_id)
            .await?
        {
            return Err(AuthError::EnrollmentIdTaken);
        }

        if let Some(manager_id) = input.manager_id {
            self.ensure_exists(manager_id).await?;
        }

        let password = RawPassword::new(password)?;
        let account = Account::new(
            name,
            enrollment_id,
            AccountPassword::from_raw(&password)?,
            sector,
            input.role.unwrap_or_default(),
            input.manager_id,
        );

        self.account_repo.create(&account).await?;

        tracing::info!(account_id = %account.id, role = %account.role, "Account created");
        Ok(account)
    }

    async fn ensure_exists(&self, id: AccountId) -> AuthResult<()> {
        self.account_repo
            .find_by_id(id)
            .await?
            .map(|_| ())
            .ok_or(AuthError::AccountNotFound)
    }
}

// ============================================================================
// Update
// ============================================================================

#[derive(Debug, Default)]
pub struct UpdateAccountInput {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub password: Option<String>,
    /// Elevated callers only
    pub enrollment_id: Option<String>,
    /// Elevated callers only
    pub role: Option<Role>,
    /// Elevated callers only
    pub manager_id: Option<AccountId>,
}

impl UpdateAccountInput {
    fn touches_privileged_fields(&self) -> bool {
        self.enrollment_id.is_some() || self.role.is_some() || self.manager_id.is_some()
    }
}

pub struct UpdateAccountUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
}

impl<A> UpdateAccountUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>) -> Self {
        Self { account_repo }
    }

    pub async fn execute(
        &self,
        caller: &Caller,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> AuthResult<Account> {
        if input.touches_privileged_fields() {
            caller.require_elevated()?;
        }

        let mut account = self
            .account_repo
            .find_by_id(id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if let Some(name) = non_blank(input.name) {
            account.name = name;
        }
        if let Some(sector) = non_blank(input.sector) {
            account.sector = sector;
        }
        if let Some(password) = input.password.filter(|p| !p.is_empty()) {
            let raw = RawPassword::new(password)?;
            account.password_hash = AccountPassword::from_raw(&raw)?;
        }
        if let Some(raw) = input.enrollment_id {
            let enrollment_id = EnrollmentId::new(&raw)?;
            if enrollment_id != account.enrollment_id
                && self
                    .account_repo
                    .exists_by_enrollment_id(&enrollment_id)
                    .await?
            {
                return Err(AuthError::EnrollmentIdTaken);
            }
            account.enrollment_id = enrollment_id;
        }
        if let Some(role) = input.role {
            account.role = role;
        }
        if let Some(manager_id) = input.manager_id {
            if manager_id == account.id {
                return Err(AuthError::Validation(
                    "Usuário não pode ser gestor de si mesmo".to_string(),
                ));
            }
            if self.account_repo.find_by_id(manager_id).await?.is_none() {
                return Err(AuthError::AccountNotFound);
            }
            account.manager_id = Some(manager_id);
        }

        account.touch();
        self.account_repo.update(&account).await?;

        tracing::info!(account_id = %account.id, updated_by = %caller.id, "Account updated");
        Ok(account)
    }
}

// ============================================================================
// Delete
// ============================================================================

pub struct DeleteAccountUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
}

impl<A> DeleteAccountUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(account_repo: Arc<A>) -> Self {
        Self { account_repo }
    }

    pub async fn execute(&self, id: AccountId) -> AuthResult<()> {
        if !self.account_repo.delete(id).await? {
            return Err(AuthError::AccountNotFound);
        }
        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

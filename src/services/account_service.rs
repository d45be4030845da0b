//! Account service - business rules for accounts and transfers.
//!
//! This service handles:
//! - Account creation defaults (generated number, zero balance, timestamp)
//! - Input validation
//! - Atomic balance transfers between two accounts
//!
//! # Atomicity Guarantees
//!
//! A transfer reads, checks and writes both accounts inside one unit of work
//! (a `SERIALIZABLE` PostgreSQL transaction in production). Either both
//! balances change or neither does.

use std::{sync::Arc, time::Duration};

use chrono::{SubsecRound, Utc};

use crate::{
    error::AppError,
    models::{
        account::{Account, AccountUpdate, NewAccount},
        money::Money,
        transfer::TransferOutcome,
    },
    repository::AccountRepository,
    services::number_generator::AccountNumberGenerator,
};

/// Longest first or last name accepted (matches the `VARCHAR(50)` columns).
pub const MAX_NAME_LENGTH: usize = 50;

/// Default pause, in milliseconds, before re-running a transfer that hit a
/// conflict.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 50;

pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS);

/// Account business logic on top of an `AccountRepository`.
///
/// Cheap to clone; shared with every handler through axum state.
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    numbers: Arc<dyn AccountNumberGenerator>,
    retry_backoff: Duration,
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        numbers: Arc<dyn AccountNumberGenerator>,
    ) -> Self {
        Self {
            repository,
            numbers,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Set the pause before a conflicting transfer is retried.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// All accounts, ordered by id.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.repository.get_accounts().await
    }

    pub async fn get_account(&self, id: i32) -> Result<Account, AppError> {
        self.repository.get_account_by_id(id).await
    }

    /// Create an account with a generated number and zero balance.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: A name is empty or too long
    /// - `Database`: Insert failed
    pub async fn create_account(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Account, AppError> {
        let new_account = NewAccount {
            first_name: validate_name("firstName", first_name)?,
            last_name: validate_name("lastName", last_name)?,
            number: self.numbers.next_number(),
            balance: Money::ZERO,
            // PostgreSQL keeps microseconds, so the value returned here
            // matches what a later read returns
            created_at: Utc::now().trunc_subsecs(6),
        };

        let id = self.repository.create_account(&new_account).await?;
        tracing::info!(account_id = id, "Account created");

        Ok(new_account.with_id(id))
    }

    /// Overwrite an account's names, number and balance.
    ///
    /// Returns the number of rows changed; 0 means the id does not exist.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: Empty/too long name or negative balance
    pub async fn update_account(&self, update: AccountUpdate) -> Result<u64, AppError> {
        if update.balance.is_negative() {
            return Err(AppError::InvalidRequest(
                "balance must not be negative".to_string(),
            ));
        }

        let update = AccountUpdate {
            first_name: validate_name("firstName", &update.first_name)?,
            last_name: validate_name("lastName", &update.last_name)?,
            ..update
        };

        let count = self.repository.update_account(&update).await?;
        tracing::info!(account_id = update.id, rows = count, "Account updated");

        Ok(count)
    }

    /// Delete an account. Returns the number of rows removed (0 if absent).
    pub async fn delete_account(&self, id: i32) -> Result<u64, AppError> {
        let count = self.repository.delete_account(id).await?;
        tracing::info!(account_id = id, rows = count, "Account deleted");

        Ok(count)
    }

    /// Move `amount` from `source_id` to `destination_id`.
    ///
    /// # Process
    ///
    /// 1. Validate amount and account ids
    /// 2. Open a unit of work and lock both accounts, lower id first
    /// 3. Reject if the source balance cannot cover the amount
    /// 4. Write both balances and commit
    ///
    /// A `TransactionConflict` is retried once after the configured backoff.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: Amount not positive, or source equals destination
    /// - `AccountNotFound`: Either account doesn't exist
    /// - `InsufficientBalance`: Source balance below amount (nothing changed)
    /// - `TransactionConflict`: Conflicted twice with concurrent transfers
    /// - `Database`: Database error occurred
    pub async fn transfer(
        &self,
        source_id: i32,
        destination_id: i32,
        amount: Money,
    ) -> Result<TransferOutcome, AppError> {
        if !amount.is_positive() {
            return Err(AppError::InvalidRequest(
                "Amount must be positive".to_string(),
            ));
        }

        if source_id == destination_id {
            return Err(AppError::InvalidRequest(
                "Cannot transfer to same account".to_string(),
            ));
        }

        match self.try_transfer(source_id, destination_id, amount).await {
            Err(err) if err.is_retryable() => {
                tracing::warn!(
                    source_id,
                    destination_id,
                    "Transfer conflicted with a concurrent transaction, retrying"
                );
                tokio::time::sleep(self.retry_backoff).await;
                self.try_transfer(source_id, destination_id, amount).await
            }
            result => result,
        }
    }

    async fn try_transfer(
        &self,
        source_id: i32,
        destination_id: i32,
        amount: Money,
    ) -> Result<TransferOutcome, AppError> {
        let mut tx = self.repository.begin().await?;

        // Fixed lock order so opposite-direction transfers can't deadlock
        let (first_id, second_id) = if source_id < destination_id {
            (source_id, destination_id)
        } else {
            (destination_id, source_id)
        };
        let first = tx.lock_account(first_id).await?;
        let second = tx.lock_account(second_id).await?;

        let (source, destination) = if first_id == source_id {
            (first, second)
        } else {
            (second, first)
        };
        let mut source = source.ok_or(AppError::AccountNotFound(source_id))?;
        let mut destination = destination.ok_or(AppError::AccountNotFound(destination_id))?;

        let Some(source_balance) = source
            .balance
            .checked_sub(amount)
            .filter(|balance| !balance.is_negative())
        else {
            tx.rollback().await?;
            return Err(AppError::InsufficientBalance(amount));
        };

        let destination_balance = destination.balance.checked_add(amount).ok_or_else(|| {
            AppError::InvalidRequest("Transfer would overflow destination balance".to_string())
        })?;

        tx.set_balance(source.id, source_balance).await?;
        tx.set_balance(destination.id, destination_balance).await?;
        tx.commit().await?;

        source.balance = source_balance;
        destination.balance = destination_balance;
        tracing::info!(source_id, destination_id, %amount, "Transfer completed");

        Ok(TransferOutcome {
            source,
            destination,
            amount,
        })
    }

    /// Verify the store is reachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

/// Trim a display name and check it is non-empty and fits the column.
fn validate_name(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(AppError::InvalidRequest(format!("{field} must not be empty")));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::InvalidRequest(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }

    Ok(trimmed.to_string())
}

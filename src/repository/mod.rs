//! Persistence boundary for account records.
//!
//! Services only talk to storage through these traits, so the same business
//! logic runs against PostgreSQL in production and an in-memory store in
//! tests.

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        account::{Account, AccountUpdate, NewAccount},
        money::Money,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAccountRepository;
pub use postgres::PgAccountRepository;

/// Account storage.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account and return the identifier assigned by the store.
    async fn create_account(&self, account: &NewAccount) -> Result<i32, AppError>;

    /// All accounts in ascending id order.
    async fn get_accounts(&self) -> Result<Vec<Account>, AppError>;

    /// Fails with `AccountNotFound` when no row matches.
    async fn get_account_by_id(&self, id: i32) -> Result<Account, AppError>;

    /// Number of rows removed, 0 when the id does not exist.
    async fn delete_account(&self, id: i32) -> Result<u64, AppError>;

    /// Overwrite names, number and balance. Number of rows changed, 0 when the
    /// id does not exist.
    async fn update_account(&self, update: &AccountUpdate) -> Result<u64, AppError>;

    /// Open a unit of work for reads and writes that must commit together.
    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, AppError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

/// A unit of work over account rows.
///
/// Dropping it without calling `commit` discards every write made through it.
#[async_trait]
pub trait AccountTransaction: Send {
    /// Read an account and hold a write lock on it until the unit of work
    /// ends. Returns `None` when the id does not exist.
    async fn lock_account(&mut self, id: i32) -> Result<Option<Account>, AppError>;

    /// Set the balance of a (previously locked) account.
    async fn set_balance(&mut self, id: i32, balance: Money) -> Result<u64, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}

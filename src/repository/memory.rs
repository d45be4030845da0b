//! In-memory account repository.
//!
//! Used by tests and for running the service without a database. A unit of
//! work holds the store lock from `begin` until it is committed or dropped,
//! so units of work run one at a time and are trivially serializable.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    error::AppError,
    models::{
        account::{Account, AccountUpdate, NewAccount},
        money::Money,
    },
    repository::{AccountRepository, AccountTransaction},
};

#[derive(Debug, Default)]
struct Store {
    last_id: i32,
    accounts: BTreeMap<i32, Account>,
}

/// Account repository keeping rows in a `BTreeMap` keyed by id.
///
/// Cloning shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountRepository {
    store: Arc<Mutex<Store>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_account(&self, account: &NewAccount) -> Result<i32, AppError> {
        let mut store = self.store.lock().await;
        store.last_id += 1;
        let id = store.last_id;
        store.accounts.insert(id, account.clone().with_id(id));
        Ok(id)
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, AppError> {
        let store = self.store.lock().await;
        Ok(store.accounts.values().cloned().collect())
    }

    async fn get_account_by_id(&self, id: i32) -> Result<Account, AppError> {
        let store = self.store.lock().await;
        store
            .accounts
            .get(&id)
            .cloned()
            .ok_or(AppError::AccountNotFound(id))
    }

    async fn delete_account(&self, id: i32) -> Result<u64, AppError> {
        let mut store = self.store.lock().await;
        Ok(u64::from(store.accounts.remove(&id).is_some()))
    }

    async fn update_account(&self, update: &AccountUpdate) -> Result<u64, AppError> {
        let mut store = self.store.lock().await;
        let Some(account) = store.accounts.get_mut(&update.id) else {
            return Ok(0);
        };

        account.first_name = update.first_name.clone();
        account.last_name = update.last_name.clone();
        account.number = update.number;
        account.balance = update.balance;
        Ok(1)
    }

    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, AppError> {
        let guard = self.store.clone().lock_owned().await;
        Ok(Box::new(InMemoryAccountTransaction {
            store: guard,
            staged: BTreeMap::new(),
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Unit of work over the in-memory store. Balance writes are staged and only
/// applied on commit.
pub struct InMemoryAccountTransaction {
    store: OwnedMutexGuard<Store>,
    staged: BTreeMap<i32, Money>,
}

#[async_trait]
impl AccountTransaction for InMemoryAccountTransaction {
    async fn lock_account(&mut self, id: i32) -> Result<Option<Account>, AppError> {
        let account = self.store.accounts.get(&id).cloned().map(|mut account| {
            if let Some(balance) = self.staged.get(&id) {
                account.balance = *balance;
            }
            account
        });
        Ok(account)
    }

    async fn set_balance(&mut self, id: i32, balance: Money) -> Result<u64, AppError> {
        if !self.store.accounts.contains_key(&id) {
            return Ok(0);
        }
        self.staged.insert(id, balance);
        Ok(1)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let InMemoryAccountTransaction { mut store, staged } = *self;
        for (id, balance) in staged {
            if let Some(account) = store.accounts.get_mut(&id) {
                account.balance = balance;
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        Ok(())
    }
}

//! PostgreSQL implementation of the account repository.
//!
//! Transfers run in a `SERIALIZABLE` transaction and lock rows with
//! `SELECT ... FOR UPDATE`. Serialization failures surface as
//! `AppError::TransactionConflict` (see `From<sqlx::Error>`).

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        account::{Account, AccountUpdate, NewAccount},
        money::Money,
    },
    repository::{AccountRepository, AccountTransaction},
};

/// Account repository backed by a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: DbPool,
}

impl PgAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create_account(&self, account: &NewAccount) -> Result<i32, AppError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO account (first_name, last_name, number, balance_cents, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(account.balance)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, AppError> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, number, balance_cents, created_at
            FROM account
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn get_account_by_id(&self, id: i32) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, number, balance_cents, created_at
            FROM account
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::AccountNotFound(id))
    }

    async fn delete_account(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update_account(&self, update: &AccountUpdate) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE account
            SET first_name = $1,
                last_name = $2,
                number = $3,
                balance_cents = $4
            WHERE id = $5
            "#,
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(update.number)
        .bind(update.balance)
        .bind(update.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn begin(&self) -> Result<Box<dyn AccountTransaction>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Must be the first statement of the transaction
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        Ok(Box::new(PgAccountTransaction { tx }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Unit of work wrapping a sqlx transaction. sqlx rolls back on drop.
pub struct PgAccountTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl AccountTransaction for PgAccountTransaction {
    async fn lock_account(&mut self, id: i32) -> Result<Option<Account>, AppError> {
        // FOR UPDATE blocks concurrent writers of this row until commit
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, first_name, last_name, number, balance_cents, created_at
            FROM account
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(account)
    }

    async fn set_balance(&mut self, id: i32, balance: Money) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE account SET balance_cents = $1 WHERE id = $2")
            .bind(balance)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

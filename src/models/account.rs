//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: Database entity representing an account
//! - `NewAccount` / `AccountUpdate`: Values handed to the repository
//! - Request bodies for the `/account` endpoints
//! - `AccountResponse`: Response body returned to clients

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::money::Money;

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `account` table. The balance is kept in cents in the
/// `balance_cents` column (never negative, enforced by a CHECK constraint).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    /// Identifier assigned by the store on insert
    pub id: i32,

    pub first_name: String,

    pub last_name: String,

    /// Generated account number. Not guaranteed to be unique.
    pub number: i64,

    /// Current balance
    #[sqlx(rename = "balance_cents")]
    pub balance: Money,

    /// Timestamp when account was created, never updated afterwards
    pub created_at: DateTime<Utc>,
}

/// A validated account waiting to be inserted.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Attach the identifier the store assigned.
    pub fn with_id(self, id: i32) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            number: self.number,
            balance: self.balance,
            created_at: self.created_at,
        }
    }
}

/// Full overwrite of an account's mutable fields, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountUpdate {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: Money,
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "firstName": "Ada",
///   "lastName": "Lovelace"
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
}

/// Request body for `PUT /account`.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "number": 4242,
///   "balance": 100.50
/// }
/// ```
///
/// `balance` accepts a JSON number or a decimal string with at most two
/// fractional digits.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: Decimal,
}

/// Request body for `DELETE /account`.
#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub id: i32,
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "firstName": "Ada",
///   "lastName": "Lovelace",
///   "number": 4242,
///   "balance": 100.5,
///   "createdAt": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,

    /// Balance as a decimal number (cents converted at the boundary)
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,

    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: account.balance.to_decimal(),
            created_at: account.created_at,
        }
    }
}

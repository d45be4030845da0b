//! Transfer request/response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    account::{Account, AccountResponse},
    money::Money,
};

/// Request to move money between two accounts.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "idDestino": 2,
///   "valor": 40.00
/// }
/// ```
///
/// Field names are kept from the public API: `id` is the source account,
/// `idDestino` the destination and `valor` the amount.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    #[serde(rename = "id")]
    pub source_id: i32,

    #[serde(rename = "idDestino")]
    pub destination_id: i32,

    #[serde(rename = "valor")]
    pub amount: Decimal,
}

/// Result of a completed transfer, with both accounts as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub source: Account,
    pub destination: Account,
    pub amount: Money,
}

/// Response body for `POST /transfer`.
///
/// ```json
/// {
///   "source": { "id": 1, "balance": 60.0, ... },
///   "destination": { "id": 2, "balance": 50.0, ... },
///   "amount": 40.0
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub source: AccountResponse,
    pub destination: AccountResponse,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl From<TransferOutcome> for TransferResponse {
    fn from(outcome: TransferOutcome) -> Self {
        Self {
            source: outcome.source.into(),
            destination: outcome.destination.into(),
            amount: outcome.amount.to_decimal(),
        }
    }
}

//! Transfer HTTP handler.
//!
//! - POST /transfer - Move money between two accounts

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    extract::AppJson,
    models::{
        money::Money,
        transfer::{TransferRequest, TransferResponse},
    },
    services::AccountService,
};

/// Transfer money between accounts.
///
/// # Request Body
///
/// ```json
/// {
///   "id": 1,
///   "idDestino": 2,
///   "valor": 40.0
/// }
/// ```
///
/// # Atomicity
///
/// Both accounts are updated in a single database transaction.
/// Either both succeed or both fail.
///
/// # Response
///
/// - **Success (200 OK)**: Both accounts after the transfer and the amount
/// - **Error (400)**: Non-positive, out-of-range or sub-cent amount, or same account
/// - **Error (404)**: Either account does not exist
/// - **Error (409)**: Conflicting concurrent transfer, safe to retry
/// - **Error (422)**: Insufficient balance, nothing was changed
pub async fn create_transfer(
    State(service): State<AccountService>,
    AppJson(request): AppJson<TransferRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    let amount = Money::from_decimal(request.amount)
        .map_err(|err| AppError::InvalidRequest(format!("valor {err}")))?;

    let outcome = service
        .transfer(request.source_id, request.destination_id, amount)
        .await?;

    Ok(Json(outcome.into()))
}

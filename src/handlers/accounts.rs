//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - GET /account - List all accounts
//! - POST /account - Create new account
//! - PUT /account - Overwrite an account
//! - DELETE /account - Delete an account
//! - GET /account/{id} - Get account by ID

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    models::{
        account::{
            AccountResponse, AccountUpdate, CreateAccountRequest, DeleteAccountRequest,
            UpdateAccountRequest,
        },
        money::Money,
    },
    services::AccountService,
};

/// List all accounts.
///
/// # Endpoint
///
/// `GET /account`
///
/// # Response
///
/// - **Success (200 OK)**: Array of accounts in id order (may be empty)
pub async fn list_accounts(
    State(service): State<AccountService>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = service.list_accounts().await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Create a new account.
///
/// # Endpoint
///
/// `POST /account`
///
/// # Request Body
///
/// ```json
/// {
///   "firstName": "Ada",
///   "lastName": "Lovelace"
/// }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: The created account with its id, generated
///   number, zero balance and creation time
/// - **Error (400)**: Missing or empty names
/// - **Error (500)**: Database error
pub async fn create_account(
    State(service): State<AccountService>,
    AppJson(request): AppJson<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = service
        .create_account(&request.first_name, &request.last_name)
        .await?;

    Ok(Json(account.into()))
}

/// Overwrite an account's names, number and balance.
///
/// # Endpoint
///
/// `PUT /account`
///
/// # Response
///
/// - **Success (200 OK)**: The account as stored after the update
/// - **Error (400)**: Invalid names or balance
/// - **Error (404)**: No account with that id
pub async fn update_account(
    State(service): State<AccountService>,
    AppJson(request): AppJson<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let balance = Money::from_decimal(request.balance)
        .map_err(|err| AppError::InvalidRequest(format!("balance {err}")))?;

    let update = AccountUpdate {
        id: request.id,
        first_name: request.first_name,
        last_name: request.last_name,
        number: request.number,
        balance,
    };

    if service.update_account(update).await? == 0 {
        return Err(AppError::AccountNotFound(request.id));
    }

    let account = service.get_account(request.id).await?;
    Ok(Json(account.into()))
}

/// Delete an account.
///
/// # Endpoint
///
/// `DELETE /account` with body `{"id": 1}`
///
/// # Response
///
/// - **Success (200 OK)**: Number of rows removed, `0` when nothing matched
pub async fn delete_account(
    State(service): State<AccountService>,
    AppJson(request): AppJson<DeleteAccountRequest>,
) -> Result<Json<u64>, AppError> {
    let count = service.delete_account(request.id).await?;

    Ok(Json(count))
}

/// Get a specific account by ID.
///
/// # Endpoint
///
/// `GET /account/{id}`
///
/// # Response
///
/// - **Success (200 OK)**: Account details
/// - **Error (400)**: `id` is not an integer
/// - **Error (404)**: Account not found
pub async fn get_account(
    State(service): State<AccountService>,
    AppPath(account_id): AppPath<i32>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = service.get_account(account_id).await?;

    Ok(Json(account.into()))
}

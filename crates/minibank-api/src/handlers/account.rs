//! Account Handlers
//!
//! Listing and opening accounts are public. Reading and deleting an account
//! sit behind the account owner layer, so the admitted account is the one
//! named in the path.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::dto::{
    AccountResponse, AccountSummary, CreateAccountRequest, DeleteAccountResponse, SessionResponse,
};
use crate::error::ApiResult;
use crate::extractors::{RequireAccount, ValidatedJson};
use crate::state::AppState;

/// List all accounts
#[utoipa::path(
    get,
    path = "/account",
    tag = "Account",
    responses(
        (status = 200, description = "All accounts", body = [AccountSummary]),
        (status = 400, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AccountSummary>>> {
    let accounts = state.store.list_accounts().await?;
    Ok(Json(accounts.iter().map(AccountSummary::from).collect()))
}

/// Open an account and log it in
#[utoipa::path(
    post,
    path = "/account",
    tag = "Account",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Account opened", body = SessionResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateAccountRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let password_hash = state.auth.password.hash_password(&request.password)?;

    let account = state
        .opener
        .open(&request.firstname, &request.lastname, &password_hash)
        .await?;
    metrics::counter!("minibank_accounts_created_total").increment(1);

    let token = state.auth.jwt.issue_token(account.number)?;

    Ok(Json(SessionResponse::new(&account, token)))
}

/// Read an account
#[utoipa::path(
    get,
    path = "/account/{number}",
    tag = "Account",
    params(("number" = i64, Path, description = "Account number")),
    security(("jwt" = [])),
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 403, description = "Permission denied", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    RequireAccount(owner): RequireAccount,
) -> ApiResult<Json<AccountResponse>> {
    let account = state.store.get_account_by_number(owner.account_number).await?;
    Ok(Json(account.into()))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/account/{number}",
    tag = "Account",
    params(("number" = i64, Path, description = "Account number")),
    security(("jwt" = [])),
    responses(
        (status = 200, description = "Account deleted", body = DeleteAccountResponse),
        (status = 403, description = "Permission denied", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    RequireAccount(owner): RequireAccount,
) -> ApiResult<Json<DeleteAccountResponse>> {
    state.store.delete_account(owner.account_number).await?;

    tracing::info!(number = owner.account_number, "Account deleted");

    Ok(Json(DeleteAccountResponse {
        deleted: owner.account_number,
    }))
}

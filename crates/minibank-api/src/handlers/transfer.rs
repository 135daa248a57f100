//! Transfer Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::dto::{TransferRequest, TRANSFER_CONFIRMATION};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{RequireAccount, ValidatedJson};
use crate::state::AppState;

/// Transfer funds from the caller's account
#[utoipa::path(
    post,
    path = "/transfer",
    tag = "Transfer",
    request_body = TransferRequest,
    security(("jwt" = [])),
    responses(
        (status = 200, description = "Transfer applied", body = String),
        (status = 400, description = "Transfer refused", body = crate::error::ErrorResponse),
        (status = 403, description = "Permission denied", body = crate::error::ErrorResponse)
    )
)]
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    RequireAccount(caller): RequireAccount,
    ValidatedJson(request): ValidatedJson<TransferRequest>,
) -> ApiResult<Json<&'static str>> {
    let result = state
        .transfers
        .transfer(caller.account_number, request.to_account_number, request.amount)
        .await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(e) if e.is_business_rule() => "rejected",
        Err(_) => "error",
    };
    metrics::counter!("minibank_transfers_total", "outcome" => outcome).increment(1);

    result.map_err(ApiError::from)?;

    Ok(Json(TRANSFER_CONFIRMATION))
}

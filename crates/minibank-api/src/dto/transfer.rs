//! Transfer DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Move funds from the caller's account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Destination account number
    pub to_account_number: i64,
    /// Amount in minor units
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
}

/// Body returned for an applied transfer
pub const TRANSFER_CONFIRMATION: &str = "amount transferred";

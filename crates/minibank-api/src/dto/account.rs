//! Account DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use minibank_db::DbAccount;

/// Open a new account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1 to 50 characters"))]
    pub firstname: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1 to 50 characters"))]
    pub lastname: String,
    pub password: String,
}

/// Entry of the public account listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountSummary {
    pub firstname: String,
    pub lastname: String,
    pub number: i64,
}

impl From<&DbAccount> for AccountSummary {
    fn from(account: &DbAccount) -> Self {
        Self {
            firstname: account.first_name.clone(),
            lastname: account.last_name.clone(),
            number: account.number,
        }
    }
}

/// Full account view for its owner
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<DbAccount> for AccountResponse {
    fn from(account: DbAccount) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

/// Confirmation of an account deletion
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteAccountResponse {
    /// Number of the deleted account
    pub deleted: i64,
}

//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use minibank_db::DbAccount;

/// Login request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Public account number
    pub number: i64,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Session issued on login or account creation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub number: i64,
    pub firstname: String,
    pub lastname: String,
    /// Token to send back in the `x-jwt-token` header
    pub token: String,
}

impl SessionResponse {
    pub fn new(account: &DbAccount, token: String) -> Self {
        Self {
            number: account.number,
            firstname: account.first_name.clone(),
            lastname: account.last_name.clone(),
            token,
        }
    }
}

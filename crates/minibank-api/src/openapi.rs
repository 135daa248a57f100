//! OpenAPI Documentation
//!
//! OpenAPI 3.0 document for the minibank API, served at
//! `/api-docs/openapi.json`.

use axum::Json;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::dto;
use crate::error::ErrorResponse;
use crate::handlers;

/// minibank API Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "minibank API",
        description = "Accounts, login and peer-to-peer transfers.",
        version = "0.1.0",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    paths(
        // Health
        handlers::health::health_check,
        handlers::health::readiness_check,
        // Auth
        handlers::auth::login,
        // Account
        handlers::account::list_accounts,
        handlers::account::create_account,
        handlers::account::get_account,
        handlers::account::delete_account,
        // Transfer
        handlers::transfer::transfer,
    ),
    components(
        schemas(
            ErrorResponse,
            handlers::health::HealthResponse,
            handlers::health::ReadinessResponse,
            dto::LoginRequest,
            dto::SessionResponse,
            dto::CreateAccountRequest,
            dto::AccountSummary,
            dto::AccountResponse,
            dto::DeleteAccountResponse,
            dto::TransferRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service health and status"),
        (name = "Authentication", description = "Login"),
        (name = "Account", description = "Account registration and management"),
        (name = "Transfer", description = "Peer-to-peer transfers")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the `x-jwt-token` header scheme
pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "jwt",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
                    minibank_auth::TOKEN_HEADER,
                ))),
            );
        }
    }
}

/// Serve the OpenAPI document
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

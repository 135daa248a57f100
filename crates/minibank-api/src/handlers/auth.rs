//! Authentication Handlers

use axum::{extract::State, Json};
use minibank_auth::AuthError;
use std::sync::Arc;

use crate::dto::{LoginRequest, SessionResponse};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Log in with account number and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 400, description = "Invalid request or credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    let account = match state.store.get_account_by_number(request.number).await {
        Ok(account) => account,
        Err(e) if e.is_not_found() => {
            tracing::debug!(number = request.number, "Login for unknown account");
            record_login("rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => {
            record_login("error");
            return Err(e.into());
        }
    };

    if !state
        .auth
        .password
        .verify_password(&request.password, &account.encrypted_password)
    {
        tracing::debug!(number = account.number, "Login with wrong password");
        record_login("rejected");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.auth.jwt.issue_token(account.number)?;

    record_login("success");
    tracing::info!(number = account.number, "Account logged in");

    Ok(Json(SessionResponse::new(&account, token)))
}

fn record_login(outcome: &'static str) {
    metrics::counter!("minibank_logins_total", "outcome" => outcome).increment(1);
}

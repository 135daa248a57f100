//! Account authorization middleware for Axum
//!
//! Gates per-account resources. For every request it:
//! 1. reads the session token from the `x-jwt-token` header
//! 2. validates it with [`JwtService`]
//! 3. resolves the target account, from the `number` path parameter when the
//!    route has one, otherwise from the token's own claim
//! 4. admits the request only if the account's number equals the claim and
//!    the token was issued after the account was opened
//!
//! Every failure produces the same 403 `{"error": "permission denied"}`.

use axum::{
    async_trait,
    extract::{rejection::RawPathParamsRejection, FromRequestParts, RawPathParams, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use minibank_db::AccountStore;

use crate::error::{AuthError, AuthResult};
use crate::jwt::JwtService;
use crate::types::{AuthenticatedAccount, ErrorBody};

/// Header carrying the session token
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Path parameter naming the account a route operates on
pub const ACCOUNT_PATH_PARAM: &str = "number";

/// Authorization middleware layer
#[derive(Clone)]
pub struct AccountOwnerLayer {
    jwt: Arc<JwtService>,
    store: Arc<dyn AccountStore>,
}

impl AccountOwnerLayer {
    /// Create a new authorization layer
    pub fn new(jwt: Arc<JwtService>, store: Arc<dyn AccountStore>) -> Self {
        Self { jwt, store }
    }
}

impl<S> Layer<S> for AccountOwnerLayer {
    type Service = AccountOwnerMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccountOwnerMiddleware {
            inner,
            jwt: self.jwt.clone(),
            store: self.store.clone(),
        }
    }
}

/// Authorization middleware service
#[derive(Clone)]
pub struct AccountOwnerMiddleware<S> {
    inner: S,
    jwt: Arc<JwtService>,
    store: Arc<dyn AccountStore>,
}

impl<S> Service<Request> for AccountOwnerMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let jwt = self.jwt.clone();
        let store = self.store.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            match authorize(&mut parts, &jwt, store.as_ref()).await {
                Ok(account) => {
                    parts.extensions.insert(account);
                    inner.call(Request::from_parts(parts, body)).await
                }
                Err(e) => {
                    tracing::debug!(
                        reason = %e,
                        method = %parts.method,
                        path = %parts.uri.path(),
                        "Permission denied"
                    );
                    Ok(permission_denied())
                }
            }
        })
    }
}

/// Run the extract / validate / resolve / authorize sequence
async fn authorize(
    parts: &mut Parts,
    jwt: &JwtService,
    store: &dyn AccountStore,
) -> AuthResult<AuthenticatedAccount> {
    let token = parts
        .headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = jwt.validate_token(token)?;

    let target = path_account_number(parts)
        .await?
        .unwrap_or(claims.account_number);

    let account = store.get_account_by_number(target).await.map_err(|e| {
        if !e.is_not_found() {
            tracing::error!(error = %e, "Account lookup failed during authorization");
        }
        AuthError::PermissionDenied
    })?;

    if account.number != claims.account_number {
        return Err(AuthError::PermissionDenied);
    }

    // Numbers are reused after deletion; a token predating the account
    // belonged to an earlier holder of the number
    if claims.iat < account.created_at.timestamp() {
        return Err(AuthError::PermissionDenied);
    }

    Ok(AuthenticatedAccount {
        account_id: account.id,
        account_number: account.number,
    })
}

/// Account number named by the route, if the route has one
async fn path_account_number(parts: &mut Parts) -> AuthResult<Option<i64>> {
    match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => params
            .iter()
            .find(|(key, _)| *key == ACCOUNT_PATH_PARAM)
            .map(|(_, value)| value.parse::<i64>().map_err(|_| AuthError::PermissionDenied))
            .transpose(),
        Err(RawPathParamsRejection::MissingPathParams(_)) => Ok(None),
        Err(_) => Err(AuthError::PermissionDenied),
    }
}

/// The uniform denial response
pub fn permission_denied() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorBody::new(AuthError::PermissionDenied.to_string())),
    )
        .into_response()
}

// =============================================================================
// Axum Extractors
// =============================================================================

/// Extractor for the account admitted by [`AccountOwnerLayer`]
pub struct RequireAccount(pub AuthenticatedAccount);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAccount
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .copied()
            .map(RequireAccount)
            .ok_or_else(permission_denied)
    }
}

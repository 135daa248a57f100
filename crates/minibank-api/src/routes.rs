//! API Routes
//!
//! Public routes and the routes gated by the account owner layer.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::openapi;
use crate::state::AppState;

/// Routes reachable without a token
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route(
            "/account",
            get(handlers::account::list_accounts).post(handlers::account::create_account),
        )
}

/// Routes admitted only for the account owning the resource
pub fn protected_routes(state: &AppState) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/account/:number",
            get(handlers::account::get_account).delete(handlers::account::delete_account),
        )
        .route("/transfer", post(handlers::transfer::transfer))
        .route_layer(state.auth.layer(state.store.clone()))
}

/// Liveness, readiness and the API document
pub fn operational_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api-docs/openapi.json", get(openapi::openapi_spec))
}

//! API Handlers
//!
//! Request handlers for all API endpoints.

pub mod account;
pub mod auth;
pub mod health;
pub mod transfer;

pub use health::*;

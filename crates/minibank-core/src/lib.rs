//! minibank Core - banking operations over an [`AccountStore`]
//!
//! # Invariants
//!
//! 1. No authorized transfer drives a balance negative
//! 2. A transfer moves funds completely or not at all
//! 3. Account numbers are unique
//!
//! [`AccountStore`]: minibank_db::AccountStore

pub mod accounts;
pub mod error;
pub mod transfer;

pub use accounts::{AccountOpener, ACCOUNT_NUMBER_SPACE, MAX_NUMBER_ATTEMPTS};
pub use error::{CoreError, CoreResult};
pub use transfer::TransferEngine;

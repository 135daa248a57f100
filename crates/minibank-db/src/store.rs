//! Account store port
//!
//! The capability set the rest of the workspace consumes. [`AccountRepo`]
//! implements it on PostgreSQL; `InMemoryAccountStore` (feature `mock`)
//! implements it for tests.
//!
//! [`AccountRepo`]: crate::repos::AccountRepo

use async_trait::async_trait;

use crate::{DbAccount, DbResult, NewAccount, TransferReceipt};

/// Persistence operations over accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account. Fails with `Duplicate` when the number is taken.
    async fn create_account(&self, account: NewAccount) -> DbResult<DbAccount>;

    /// Delete the account with the given public number
    async fn delete_account(&self, number: i64) -> DbResult<()>;

    async fn get_account_by_number(&self, number: i64) -> DbResult<DbAccount>;

    async fn get_account_by_id(&self, id: i32) -> DbResult<DbAccount>;

    /// Overwrite the balance of an account
    async fn update_balance(&self, number: i64, balance: i64) -> DbResult<()>;

    async fn list_accounts(&self) -> DbResult<Vec<DbAccount>>;

    /// Debit `from` and credit `to` as one all-or-nothing unit.
    ///
    /// The sender's balance is re-checked while both accounts are locked, so
    /// two concurrent transfers can never overdraw the same account.
    async fn transfer_funds(&self, from: i64, to: i64, amount: i64) -> DbResult<TransferReceipt>;

    /// Cheap liveness probe of the backing storage
    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}

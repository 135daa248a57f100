//! Peer-to-peer transfers
//!
//! Checks run in a fixed order so the first violated rule decides the error:
//! amount, same account, caller exists, caller funds, destination exists.
//! The store then applies debit and credit as one unit and re-checks the
//! caller's balance under its own lock.

use std::sync::Arc;

use minibank_db::{AccountStore, DbAccount, DbError, TransferReceipt};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};

/// Moves funds between accounts of one store
#[derive(Clone)]
pub struct TransferEngine {
    store: Arc<dyn AccountStore>,
}

impl TransferEngine {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Transfer `amount` from `caller` to `destination`
    pub async fn transfer(
        &self,
        caller: i64,
        destination: i64,
        amount: i64,
    ) -> CoreResult<TransferReceipt> {
        if amount <= 0 {
            return Err(CoreError::InvalidAmount { amount });
        }

        if destination == caller {
            return Err(CoreError::SameAccount);
        }

        let from = self.load(caller).await?;
        if from.balance < amount {
            debug!(
                from = caller,
                balance = from.balance,
                amount,
                "Transfer refused: insufficient funds"
            );
            return Err(CoreError::InsufficientFunds {
                available: from.balance,
                required: amount,
            });
        }

        self.load(destination).await?;

        let receipt = self
            .store
            .transfer_funds(caller, destination, amount)
            .await
            .map_err(|e| match e {
                DbError::InsufficientBalance {
                    available,
                    required,
                } => CoreError::InsufficientFunds {
                    available,
                    required,
                },
                other => CoreError::Store(other),
            })?;

        info!(
            from = receipt.from,
            to = receipt.to,
            amount = receipt.amount,
            from_balance = receipt.from_balance,
            "Transfer applied"
        );

        Ok(receipt)
    }

    async fn load(&self, number: i64) -> CoreResult<DbAccount> {
        self.store.get_account_by_number(number).await.map_err(|e| {
            if e.is_not_found() {
                CoreError::AccountNotFound { number }
            } else {
                CoreError::Store(e)
            }
        })
    }
}

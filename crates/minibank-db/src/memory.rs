//! In-memory account store
//!
//! Same semantics as [`AccountRepo`](crate::repos::AccountRepo), including
//! the unique account number and the all-or-nothing transfer, with a single
//! write lock standing in for row locks.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{AccountStore, DbAccount, DbError, DbResult, NewAccount, TransferReceipt};

#[derive(Default)]
struct Accounts {
    by_number: HashMap<i64, DbAccount>,
    next_id: i32,
}

/// Account store kept in process memory
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Accounts>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.by_number.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create_account(&self, account: NewAccount) -> DbResult<DbAccount> {
        let mut accounts = self.accounts.write().await;

        if accounts.by_number.contains_key(&account.number) {
            return Err(DbError::Duplicate(format!(
                "account number {} already exists",
                account.number
            )));
        }

        accounts.next_id += 1;
        let created = DbAccount {
            id: accounts.next_id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            encrypted_password: account.encrypted_password,
            balance: account.balance,
            created_at: account.created_at,
        };
        accounts.by_number.insert(created.number, created.clone());

        Ok(created)
    }

    async fn delete_account(&self, number: i64) -> DbResult<()> {
        self.accounts
            .write()
            .await
            .by_number
            .remove(&number)
            .map(|_| ())
            .ok_or_else(|| DbError::account_number(number))
    }

    async fn get_account_by_number(&self, number: i64) -> DbResult<DbAccount> {
        self.accounts
            .read()
            .await
            .by_number
            .get(&number)
            .cloned()
            .ok_or_else(|| DbError::account_number(number))
    }

    async fn get_account_by_id(&self, id: i32) -> DbResult<DbAccount> {
        self.accounts
            .read()
            .await
            .by_number
            .values()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| DbError::account_id(id))
    }

    async fn update_balance(&self, number: i64, balance: i64) -> DbResult<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .by_number
            .get_mut(&number)
            .ok_or_else(|| DbError::account_number(number))?;
        account.balance = balance;
        Ok(())
    }

    async fn list_accounts(&self) -> DbResult<Vec<DbAccount>> {
        let mut accounts: Vec<DbAccount> =
            self.accounts.read().await.by_number.values().cloned().collect();
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }

    async fn transfer_funds(&self, from: i64, to: i64, amount: i64) -> DbResult<TransferReceipt> {
        if amount <= 0 {
            return Err(DbError::InvalidInput("Transfer amount must be positive".to_string()));
        }
        if from == to {
            return Err(DbError::InvalidInput("Cannot transfer to the same account".to_string()));
        }

        let mut accounts = self.accounts.write().await;

        let available = accounts
            .by_number
            .get(&from)
            .map(|a| a.balance)
            .ok_or_else(|| DbError::account_number(from))?;
        let received = accounts
            .by_number
            .get(&to)
            .map(|a| a.balance)
            .ok_or_else(|| DbError::account_number(to))?;
        if available < amount {
            return Err(DbError::InsufficientBalance {
                available,
                required: amount,
            });
        }

        // Both balances are computed before either row changes
        let from_balance = available - amount;
        let to_balance = received
            .checked_add(amount)
            .ok_or_else(|| DbError::InvalidInput("Transfer would overflow the balance".to_string()))?;

        if let Some(sender) = accounts.by_number.get_mut(&from) {
            sender.balance = from_balance;
        }
        if let Some(receiver) = accounts.by_number.get_mut(&to) {
            receiver.balance = to_balance;
        }

        Ok(TransferReceipt {
            from,
            to,
            amount,
            from_balance,
            to_balance,
        })
    }
}

//! Account repository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::{AccountStore, DbAccount, DbError, DbResult, NewAccount, TransferReceipt};

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, number, encrypted_password, balance, created_at";

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct AccountRepo {
    pool: PgPool,
}

impl AccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(&self, clause: &str, value: i64) -> DbResult<Option<DbAccount>> {
        let account = sqlx::query_as::<_, DbAccount>(&format!(
            "SELECT {} FROM account WHERE {} = $1",
            ACCOUNT_COLUMNS, clause
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}

#[async_trait]
impl AccountStore for AccountRepo {
    async fn create_account(&self, account: NewAccount) -> DbResult<DbAccount> {
        let number = account.number;
        let created = sqlx::query_as::<_, DbAccount>(&format!(
            r#"
            INSERT INTO account
                (first_name, last_name, number, encrypted_password, balance, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(&account.encrypted_password)
        .bind(account.balance)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("account_number_key") {
                    return DbError::Duplicate(format!("account number {} already exists", number));
                }
            }
            DbError::Query(e)
        })?;

        Ok(created)
    }

    async fn delete_account(&self, number: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM account WHERE number = $1")
            .bind(number)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::account_number(number));
        }

        Ok(())
    }

    async fn get_account_by_number(&self, number: i64) -> DbResult<DbAccount> {
        self.fetch_one_where("number", number)
            .await?
            .ok_or_else(|| DbError::account_number(number))
    }

    async fn get_account_by_id(&self, id: i32) -> DbResult<DbAccount> {
        self.fetch_one_where("id", i64::from(id))
            .await?
            .ok_or_else(|| DbError::account_id(id))
    }

    async fn update_balance(&self, number: i64, balance: i64) -> DbResult<()> {
        let result = sqlx::query("UPDATE account SET balance = $1 WHERE number = $2")
            .bind(balance)
            .bind(number)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::account_number(number));
        }

        Ok(())
    }

    async fn list_accounts(&self) -> DbResult<Vec<DbAccount>> {
        let accounts = sqlx::query_as::<_, DbAccount>(&format!(
            "SELECT {} FROM account ORDER BY id",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn transfer_funds(&self, from: i64, to: i64, amount: i64) -> DbResult<TransferReceipt> {
        if amount <= 0 {
            return Err(DbError::InvalidInput("Transfer amount must be positive".to_string()));
        }
        if from == to {
            return Err(DbError::InvalidInput("Cannot transfer to the same account".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        // Lock both rows in number order so opposing transfers cannot deadlock
        let (low, high) = if from < to { (from, to) } else { (to, from) };
        let low_balance = lock_balance(&mut tx, low).await?;
        let high_balance = lock_balance(&mut tx, high).await?;
        let (from_before, to_before) = if from < to {
            (low_balance, high_balance)
        } else {
            (high_balance, low_balance)
        };

        if from_before < amount {
            return Err(DbError::InsufficientBalance {
                available: from_before,
                required: amount,
            });
        }

        let from_balance: i64 = sqlx::query_scalar(
            "UPDATE account SET balance = balance - $1 WHERE number = $2 RETURNING balance",
        )
        .bind(amount)
        .bind(from)
        .fetch_one(&mut *tx)
        .await?;

        let to_balance: i64 = sqlx::query_scalar(
            "UPDATE account SET balance = balance + $1 WHERE number = $2 RETURNING balance",
        )
        .bind(amount)
        .bind(to)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(from, to, amount, to_before, "Transfer committed");

        Ok(TransferReceipt {
            from,
            to,
            amount,
            from_balance,
            to_balance,
        })
    }

    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Lock an account row for the rest of the transaction and read its balance
async fn lock_balance(tx: &mut Transaction<'_, Postgres>, number: i64) -> DbResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT balance FROM account WHERE number = $1 FOR UPDATE")
        .bind(number)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| DbError::account_number(number))
}

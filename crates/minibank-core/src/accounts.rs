//! Account opening
//!
//! Public account numbers are drawn at random from `[0, ACCOUNT_NUMBER_SPACE)`.
//! Uniqueness is enforced by the store; a collision draws a fresh number.

use std::sync::Arc;

use minibank_db::{AccountStore, DbAccount, DbError, NewAccount};
use rand::Rng;
use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};

/// Exclusive upper bound of generated account numbers
pub const ACCOUNT_NUMBER_SPACE: i64 = 1_000_000;

/// Attempts made before giving up on a free number
pub const MAX_NUMBER_ATTEMPTS: u32 = 5;

type NumberSource = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Creates accounts with freshly allocated numbers
#[derive(Clone)]
pub struct AccountOpener {
    store: Arc<dyn AccountStore>,
    next_number: NumberSource,
}

impl AccountOpener {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self::with_number_source(store, Arc::new(random_account_number))
    }

    /// Opener drawing account numbers from `source`
    pub fn with_number_source(store: Arc<dyn AccountStore>, source: NumberSource) -> Self {
        Self {
            store,
            next_number: source,
        }
    }

    /// Open a zero-balance account for an already hashed password
    pub async fn open(
        &self,
        first_name: &str,
        last_name: &str,
        password_hash: &str,
    ) -> CoreResult<DbAccount> {
        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let number = (self.next_number)();
            let new = NewAccount::new(first_name, last_name, number, password_hash);

            match self.store.create_account(new).await {
                Ok(account) => {
                    info!(number = account.number, id = account.id, "Account opened");
                    return Ok(account);
                }
                Err(DbError::Duplicate(_)) => {
                    warn!(number, attempt, "Account number already taken, drawing another");
                }
                Err(e) => return Err(CoreError::Store(e)),
            }
        }

        Err(CoreError::NumberSpaceExhausted {
            attempts: MAX_NUMBER_ATTEMPTS,
        })
    }
}

/// Random account number in `[0, ACCOUNT_NUMBER_SPACE)`
pub fn random_account_number() -> i64 {
    rand::thread_rng().gen_range(0..ACCOUNT_NUMBER_SPACE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minibank_db::InMemoryAccountStore;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[test]
    fn test_random_numbers_in_range() {
        for _ in 0..1000 {
            let n = random_account_number();
            assert!((0..ACCOUNT_NUMBER_SPACE).contains(&n));
        }
    }

    #[tokio::test]
    async fn test_open_creates_zero_balance_account() {
        let store = Arc::new(InMemoryAccountStore::new());
        let opener = AccountOpener::new(store.clone());

        let account = opener.open("Alice", "Smith", "hash").await.unwrap();

        assert_eq!(account.first_name, "Alice");
        assert_eq!(account.balance, 0);
        assert_eq!(account.encrypted_password, "hash");
        assert_eq!(store.get_account_by_number(account.number).await.unwrap(), account);
    }

    #[tokio::test]
    async fn test_collision_draws_another_number() {
        let store = Arc::new(InMemoryAccountStore::new());
        store
            .create_account(NewAccount::new("Taken", "Number", 7, "hash"))
            .await
            .unwrap();

        // Yields 7, 7, 8, ...
        let counter = Arc::new(AtomicI64::new(0));
        let source = {
            let counter = counter.clone();
            Arc::new(move || 7 + (counter.fetch_add(1, Ordering::SeqCst) / 2))
        };
        let opener = AccountOpener::with_number_source(store.clone(), source);

        let account = opener.open("Bob", "Jones", "hash").await.unwrap();

        assert_eq!(account.number, 8);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let store = Arc::new(InMemoryAccountStore::new());
        store
            .create_account(NewAccount::new("Taken", "Number", 7, "hash"))
            .await
            .unwrap();

        let opener = AccountOpener::with_number_source(store.clone(), Arc::new(|| 7));

        assert!(matches!(
            opener.open("Bob", "Jones", "hash").await,
            Err(CoreError::NumberSpaceExhausted { attempts: MAX_NUMBER_ATTEMPTS })
        ));
        assert_eq!(store.len().await, 1);
    }
}

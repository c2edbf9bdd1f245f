//! Account store — the shared in-memory account map.
//!
//! Owns account creation (duplicates rejected atomically), lookup, and
//! the per-account exclusive locks used by multi-account mutators.
//! All access to account state goes through this boundary, so thread
//! safety is enforced in exactly one place.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::types::{Account, TellerError};

/// A stored entry: the current account state plus the exclusive lock
/// handle that serialises balance mutations spanning this account.
struct StoredAccount {
    account: Account,
    lock: Arc<Mutex<()>>,
}

/// Thread-safe in-memory account repository.
///
/// The map lock serialises structural changes (insert, replace, clear).
/// The per-account mutexes are handed out to mutators that need to hold
/// an account across a multi-step operation; the store itself never
/// takes them. Readers always see a complete account snapshot.
#[derive(Default)]
pub struct AccountStore {
    accounts: RwLock<HashMap<String, StoredAccount>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a new account.
    ///
    /// Duplicate detection happens under the map's write lock, so two
    /// concurrent creates with the same id cannot both succeed. Negative
    /// starting balances are rejected here as well, even though the API
    /// layer validates them first.
    pub async fn create(&self, account: Account) -> Result<(), TellerError> {
        if account.balance < Decimal::ZERO {
            return Err(TellerError::NegativeInitialBalance);
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id) {
            return Err(TellerError::DuplicateAccountId(account.id));
        }

        debug!(account_id = %account.id, balance = %account.balance, "Account created");
        accounts.insert(
            account.id.clone(),
            StoredAccount {
                account,
                lock: Arc::new(Mutex::new(())),
            },
        );
        Ok(())
    }

    /// The current state for `id`, or None if no such account exists.
    /// Cloned under the map's read lock, so never a half-updated account.
    pub async fn get(&self, id: &str) -> Option<Account> {
        self.accounts
            .read()
            .await
            .get(id)
            .map(|entry| entry.account.clone())
    }

    /// Replace the stored state for `account.id`.
    ///
    /// Used by the transfer engine while holding that account's lock
    /// handle. The account is assumed to exist; an update for an unknown
    /// id is ignored with a warning.
    pub async fn update(&self, account: Account) {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&account.id) {
            Some(entry) => entry.account = account,
            None => warn!(account_id = %account.id, "Update for unknown account ignored"),
        }
    }

    /// The exclusive lock handle for `id`, shared so callers can hold
    /// owned guards across await points.
    pub async fn lock_handle(&self, id: &str) -> Option<Arc<Mutex<()>>> {
        self.accounts
            .read()
            .await
            .get(id)
            .map(|entry| Arc::clone(&entry.lock))
    }

    /// Remove all accounts. Exposed for test isolation; not used in
    /// normal operation.
    pub async fn clear(&self) {
        self.accounts.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = AccountStore::new();
        store.create(Account::new("Id-123", dec!(1000))).await.unwrap();

        let account = store.get("Id-123").await.unwrap();
        assert_eq!(account.id, "Id-123");
        assert_eq!(account.balance, dec!(1000));
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let store = AccountStore::new();
        assert!(store.get("Id-999").await.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let store = AccountStore::new();
        store.create(Account::new("Id-123", dec!(1000))).await.unwrap();

        let err = store
            .create(Account::new("Id-123", dec!(50)))
            .await
            .unwrap_err();
        assert_eq!(err, TellerError::DuplicateAccountId("Id-123".into()));

        // First account's state is untouched.
        assert_eq!(store.get("Id-123").await.unwrap().balance, dec!(1000));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_balance() {
        let store = AccountStore::new();
        let err = store
            .create(Account::new("Id-1", dec!(-5)))
            .await
            .unwrap_err();
        assert_eq!(err, TellerError::NegativeInitialBalance);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_allows_zero_balance() {
        let store = AccountStore::new();
        store.create(Account::new("Id-0", Decimal::ZERO)).await.unwrap();
        assert_eq!(store.get("Id-0").await.unwrap().balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_replaces_state() {
        let store = AccountStore::new();
        store.create(Account::new("Id-1", dec!(100))).await.unwrap();

        store.update(Account::new("Id-1", dec!(80))).await;
        assert_eq!(store.get("Id-1").await.unwrap().balance, dec!(80));
    }

    #[tokio::test]
    async fn test_update_unknown_account_is_ignored() {
        let store = AccountStore::new();
        store.update(Account::new("Id-ghost", dec!(10))).await;
        assert!(store.get("Id-ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = AccountStore::new();
        store.create(Account::new("Id-1", dec!(1))).await.unwrap();
        store.create(Account::new("Id-2", dec!(2))).await.unwrap();
        assert_eq!(store.len().await, 2);

        store.clear().await;
        assert!(store.is_empty().await);
        assert!(store.get("Id-1").await.is_none());
    }

    #[tokio::test]
    async fn test_lock_handle_is_shared_per_account() {
        let store = AccountStore::new();
        store.create(Account::new("Id-1", dec!(1))).await.unwrap();

        let a = store.lock_handle("Id-1").await.unwrap();
        let b = store.lock_handle("Id-1").await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        assert!(store.lock_handle("Id-404").await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_same_id_single_winner() {
        let store = Arc::new(AccountStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.create(Account::new("Id-race", Decimal::from(i))).await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }
}

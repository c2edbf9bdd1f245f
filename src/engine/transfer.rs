//! Transfer engine — atomic two-account balance transfers.
//!
//! Both account locks are acquired in lexicographic id order, so
//! concurrent transfers over overlapping pairs (A→B with B→A, cycles,
//! chains) can never wait on each other in a circle. The debit/credit
//! pair is written back while both locks are held; notifications go out
//! only after the locks are released.

use chrono::Utc;
use futures::future::join_all;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::notify::TransferNotifier;
use crate::store::AccountStore;
use crate::types::{Account, TellerError, TransferReceipt};

pub struct TransferEngine {
    store: Arc<AccountStore>,
    notifier: Arc<dyn TransferNotifier>,
}

impl TransferEngine {
    pub fn new(store: Arc<AccountStore>, notifier: Arc<dyn TransferNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Move `amount` from one account to another.
    ///
    /// Validation happens before any mutation: the amount must be
    /// strictly positive and both accounts must exist. Funds are
    /// re-checked once the locks are held. Every error path leaves both
    /// balances exactly as they were.
    pub async fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, TellerError> {
        if amount <= Decimal::ZERO {
            return Err(TellerError::InvalidAmount);
        }

        // Initial reads double as existence checks.
        self.store
            .get(from_id)
            .await
            .ok_or_else(|| TellerError::AccountNotFound(from_id.to_string()))?;
        self.store
            .get(to_id)
            .await
            .ok_or_else(|| TellerError::AccountNotFound(to_id.to_string()))?;

        let from_lock = self
            .store
            .lock_handle(from_id)
            .await
            .ok_or_else(|| TellerError::AccountNotFound(from_id.to_string()))?;
        let to_lock = self
            .store
            .lock_handle(to_id)
            .await
            .ok_or_else(|| TellerError::AccountNotFound(to_id.to_string()))?;

        let (from_after, to_after) = {
            // Acquire in lexicographic id order regardless of transfer
            // direction. Equal ids need a single lock.
            let _guards = match from_id.cmp(to_id) {
                Ordering::Less => (
                    from_lock.lock_owned().await,
                    Some(to_lock.lock_owned().await),
                ),
                Ordering::Greater => (
                    to_lock.lock_owned().await,
                    Some(from_lock.lock_owned().await),
                ),
                Ordering::Equal => (from_lock.lock_owned().await, None),
            };

            // Re-check funds now that the source is locked.
            let from = self
                .store
                .get(from_id)
                .await
                .ok_or_else(|| TellerError::AccountNotFound(from_id.to_string()))?;
            if from.balance < amount {
                return Err(TellerError::InsufficientFunds(from_id.to_string()));
            }

            if from_id == to_id {
                // Self-transfer: debit and credit cancel out. Validated
                // like any other transfer; the balance stays as it is.
                (from.clone(), from)
            } else {
                let to = self
                    .store
                    .get(to_id)
                    .await
                    .ok_or_else(|| TellerError::AccountNotFound(to_id.to_string()))?;

                let from_after = Account::new(from.id, from.balance - amount);
                let to_after = Account::new(to.id, to.balance + amount);

                // Both write-backs happen while both locks are held.
                self.store.update(from_after.clone()).await;
                self.store.update(to_after.clone()).await;

                (from_after, to_after)
            }
            // Locks release here, after the write-backs.
        };

        let receipt = TransferReceipt {
            transfer_id: Uuid::new_v4().to_string(),
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            amount,
            timestamp: Utc::now(),
        };

        info!(
            transfer_id = %receipt.transfer_id,
            from = %receipt.from_id,
            to = %receipt.to_id,
            amount = %amount,
            "Transfer committed"
        );

        // Post-commit, best-effort. A failed delivery never rolls back
        // or re-surfaces as a transfer failure.
        let transferred = format!("Transferred {amount} to {to_id}");
        let received = format!("Received {amount} from {from_id}");
        let sends = vec![
            self.notifier.notify_transfer(&from_after, &transferred),
            self.notifier.notify_transfer(&to_after, &received),
        ];
        for (account, result) in [&from_after, &to_after].into_iter().zip(join_all(sends).await) {
            if let Err(e) = result {
                warn!(
                    account_id = %account.id,
                    error = %e,
                    "Transfer notification failed"
                );
            }
        }

        Ok(receipt)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Notification collaborators.
//!
//! Defines the `TransferNotifier` trait and provides implementations:
//! - Email: records deliveries in the service log
//! - Webhook: POSTs notifications to a configured HTTP endpoint
//!
//! The transfer engine treats notification as fire-and-forget: by the
//! time a notifier runs, the monetary transfer has already committed.

pub mod email;
pub mod webhook;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::Account;

/// Abstraction over transfer notification channels.
///
/// Invoked twice per successful transfer: once for the debited account
/// and once for the credited one. Implementors report failures through
/// the returned `Result`; the engine logs and swallows them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferNotifier: Send + Sync {
    /// Deliver `message` to the holder of `account`.
    async fn notify_transfer(&self, account: &Account, message: &str) -> Result<()>;

    /// Channel name for logging and identification.
    fn name(&self) -> &str;
}

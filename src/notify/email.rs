//! Email notification channel.
//!
//! No SMTP relay is wired up yet; deliveries are recorded in the
//! structured log with enough context to be replayed against a real
//! mail provider later.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::TransferNotifier;
use crate::types::Account;

const CHANNEL_NAME: &str = "email";

/// Logs each notification as a sent email.
pub struct EmailNotifier {
    sender: String,
}

impl EmailNotifier {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

impl Default for EmailNotifier {
    fn default() -> Self {
        Self::new("noreply@teller.local")
    }
}

#[async_trait]
impl TransferNotifier for EmailNotifier {
    async fn notify_transfer(&self, account: &Account, message: &str) -> Result<()> {
        info!(
            channel = CHANNEL_NAME,
            sender = %self.sender,
            account_id = %account.id,
            message,
            "Transfer notification sent"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        CHANNEL_NAME
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
    async fn test_notify_always_succeeds() {
        let notifier = EmailNotifier::default();
        let account = Account::new("Id-1", dec!(100));

        let result = notifier
            .notify_transfer(&account, "Transferred 20 to Id-2")
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_channel_name() {
        assert_eq!(EmailNotifier::default().name(), "email");
    }
}

//! Webhook notification channel.
//!
//! POSTs a JSON payload to a configured endpoint for each notification.
//! Transport and non-2xx failures surface as errors; the transfer engine
//! logs them without failing the committed transfer.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::TransferNotifier;
use crate::types::Account;

const CHANNEL_NAME: &str = "webhook";

/// The payload delivered to the webhook endpoint.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    account_id: &'a str,
    balance: Decimal,
    message: &'a str,
    sent_at: DateTime<Utc>,
}

/// Delivers notifications over HTTP.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build webhook HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl TransferNotifier for WebhookNotifier {
    async fn notify_transfer(&self, account: &Account, message: &str) -> Result<()> {
        let payload = WebhookPayload {
            account_id: &account.id,
            balance: account.balance,
            message,
            sent_at: Utc::now(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Webhook request to {} failed", self.url))?;

        response
            .error_for_status()
            .with_context(|| format!("Webhook endpoint {} rejected notification", self.url))?;

        debug!(
            channel = CHANNEL_NAME,
            account_id = %account.id,
            "Transfer notification delivered"
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

//! Shared types for the TELLER service.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that the store, engine, and API
//! modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A monetary account: a unique string identity plus a decimal balance.
///
/// The id never changes after creation. The balance is non-negative
/// after any completed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub balance: Decimal,
}

impl Account {
    pub fn new(id: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: id.into(),
            balance,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (balance: {})", self.id, self.balance)
    }
}

// ---------------------------------------------------------------------------
// Transfer receipt
// ---------------------------------------------------------------------------

/// Issued for every committed transfer. The id ties the API response,
/// the log lines, and the outgoing notifications together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub transfer_id: String,
    pub from_id: String,
    pub to_id: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for TransferReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} amount {} [{}]",
            self.from_id, self.to_id, self.amount, self.transfer_id,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for TELLER.
///
/// Each failure kind is a distinct variant so callers and tests can
/// branch on kind rather than message text. All of them are detected
/// before any balance mutation and imply zero state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TellerError {
    #[error("Account id {0} already exists")]
    DuplicateAccountId(String),

    #[error("Account {0} does not exist")]
    AccountNotFound(String),

    #[error("Transfer amount must be greater than zero")]
    InvalidAmount,

    #[error("Insufficient balance in account {0}")]
    InsufficientFunds(String),

    #[error("Initial balance must not be negative")]
    NegativeInitialBalance,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

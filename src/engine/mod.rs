//! Engine — orchestration of account mutations.
//!
//! `transfer` holds the only multi-account mutation path in the
//! service; its locking discipline lives in `transfer.rs`.

pub mod transfer;

pub use transfer::TransferEngine;

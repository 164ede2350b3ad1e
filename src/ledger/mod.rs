//! Ledger module for account balances and transaction history.
//!
//! This module handles:
//! - Account balances in integer minor units
//! - The append-only transaction log
//! - Per-account serialized credit/debit operations

pub mod ledger;
pub mod types;

pub use ledger::Ledger;
pub use types::{AccountBalance, LedgerTransaction, TxKind, TxReason};

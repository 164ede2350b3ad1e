//! Settlement module for resolving bets from final scores.
//!
//! This module handles:
//! - Per-leg outcome evaluation and overall-status aggregation
//! - Idempotent terminal transitions with the winnings credit
//! - The write-once settlement archive

pub mod evaluator;
pub mod processor;

pub use evaluator::{compute_overall_status, evaluate_selection};
pub use processor::{SettledBet, SettlementProcessor};

//! Prometheus metrics for the wagering engine.
//!
//! This module provides metrics for:
//! - Bet placement volume and latency
//! - Settlement outcomes and latency
//! - Ledger transaction volume

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

use crate::bet::types::BetStatus;
use crate::ledger::TxKind;

// === Metric Name Constants ===

/// Bets placed counter metric name.
pub const METRIC_BETS_PLACED: &str = "bets_placed_total";
/// Bets settled counter metric name (labelled by terminal status).
pub const METRIC_BETS_SETTLED: &str = "bets_settled_total";
/// Ledger transactions counter metric name (labelled by kind).
pub const METRIC_LEDGER_TRANSACTIONS: &str = "ledger_transactions_total";
/// Bet placement latency metric name.
pub const METRIC_PLACE_BET_LATENCY: &str = "place_bet_latency_ms";
/// Settlement latency metric name.
pub const METRIC_SETTLEMENT_LATENCY: &str = "settlement_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_BETS_PLACED, "Total number of bets placed");
    describe_counter!(
        METRIC_BETS_SETTLED,
        "Total number of bets settled, by terminal status"
    );
    describe_counter!(
        METRIC_LEDGER_TRANSACTIONS,
        "Total number of ledger transactions, by kind"
    );

    describe_histogram!(
        METRIC_PLACE_BET_LATENCY,
        "Bet placement latency in milliseconds"
    );
    describe_histogram!(
        METRIC_SETTLEMENT_LATENCY,
        "Settlement transition latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Increment the bets placed counter.
pub fn inc_bets_placed() {
    counter!(METRIC_BETS_PLACED).increment(1);
}

/// Increment the bets settled counter for a terminal status.
pub fn inc_bets_settled(status: BetStatus) {
    counter!(METRIC_BETS_SETTLED, "status" => status.to_string()).increment(1);
}

/// Increment the ledger transactions counter for a transaction kind.
pub fn inc_ledger_transactions(kind: TxKind) {
    counter!(METRIC_LEDGER_TRANSACTIONS, "kind" => kind.to_string()).increment(1);
}

/// Record bet placement latency.
pub fn record_place_bet_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_PLACE_BET_LATENCY).record(latency_ms);
}

/// Record settlement transition latency.
pub fn record_settlement_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_SETTLEMENT_LATENCY).record(latency_ms);
}

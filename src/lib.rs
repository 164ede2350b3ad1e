//! Wagering ledger and settlement engine.
//!
//! This library implements the money-moving core of a sports-betting
//! platform: an append-only balance ledger, bet placement with selection
//! validation and odds aggregation, a per-bet state machine, and an outcome
//! evaluator that turns final scores into settled bets and ledger credits.
//!
//! # Flow
//!
//! ```text
//! stake + selections ─▶ normalize ─▶ debit stake ─▶ pending bet
//!                                                       │
//! score feed ─▶ evaluate legs ─▶ aggregate ─▶ settle ─▶ won/lost/void
//!                                                │
//!                                         credit winnings
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`ledger`]: Account balances and the append-only transaction log
//! - [`selection`]: Selection validation, dedup, and odds aggregation
//! - [`bet`]: Bet lifecycle (placement, score updates, read projections)
//! - [`settlement`]: Outcome evaluation and idempotent settlement
//! - [`api`]: HTTP API for placement, scoring, wallet, and status
//! - [`metrics`]: Prometheus metrics

pub mod api;
pub mod bet;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod selection;
pub mod settlement;

pub use config::Config;
pub use error::{EngineError, Result};

//! Selection module for wager legs.
//!
//! This module handles:
//! - Selection types and market kinds
//! - Validation and per-event deduplication
//! - Price rounding and combined-odds aggregation

pub mod normalizer;
pub mod types;

pub use normalizer::{combined_odds, normalize_selections, PRICE_DECIMALS};
pub use types::{MarketKind, RawSelection, Selection, SelectionScore, SelectionStatus};

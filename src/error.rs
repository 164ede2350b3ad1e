//! Unified error types for the wagering engine.

use thiserror::Error;

/// Unified error type for the wagering engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Ledger/balance error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Bet placement or lifecycle error.
    #[error("bet error: {0}")]
    Bet(#[from] BetError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Account balance and transaction errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Amount was zero or negative.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount in minor units.
        amount: i64,
    },

    /// Balance too low to cover the debit.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        /// Required amount in minor units.
        required: i64,
        /// Available balance in minor units.
        available: i64,
    },

    /// Caller lacks the role required for the operation.
    #[error("unauthorized: role {role:?} may not credit accounts")]
    Unauthorized {
        /// The rejected caller role.
        role: String,
    },
}

/// Bet placement and lifecycle errors.
#[derive(Error, Debug)]
pub enum BetError {
    /// No selections were provided.
    #[error("no selections provided")]
    EmptySelections,

    /// A selection failed validation.
    #[error("invalid selection: {field}")]
    InvalidSelection {
        /// The offending field.
        field: &'static str,
    },

    /// Too many selections after deduplication.
    #[error("too many selections: {count} exceeds maximum {max}")]
    TooManySelections {
        /// Deduplicated selection count.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Stake was zero or negative.
    #[error("invalid stake: {stake}")]
    InvalidStake {
        /// The rejected stake in minor units.
        stake: i64,
    },

    /// Combined odds exceeded representable range.
    #[error("combined odds overflow across {legs} legs")]
    OddsOverflow {
        /// Number of legs in the bet.
        legs: usize,
    },

    /// No bet exists with the given ID.
    #[error("bet {bet_id} not found")]
    BetNotFound {
        /// The missing bet ID.
        bet_id: String,
    },

    /// A bet with the given ID already exists.
    #[error("bet {bet_id} already exists")]
    DuplicateBet {
        /// The colliding bet ID.
        bet_id: String,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, EngineError>;

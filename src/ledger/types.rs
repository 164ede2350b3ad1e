//! Ledger types: balances and the transaction log.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    /// Balance increase.
    #[strum(serialize = "credit")]
    Credit,
    /// Balance decrease.
    #[strum(serialize = "debit")]
    Debit,
}

/// Business reason attached to a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
pub enum TxReason {
    /// Stake debit at bet placement.
    #[strum(serialize = "bet_place")]
    BetPlace,
    /// Winnings credit at settlement.
    #[strum(serialize = "bet_win")]
    BetWin,
    /// Stake returned after a failed placement.
    #[strum(serialize = "bet_place_reversal")]
    BetPlaceReversal,
    /// Operational/test credit.
    #[strum(serialize = "faucet")]
    Faucet,
    /// Manual credit by an administrator.
    #[strum(serialize = "admin_credit")]
    AdminCredit,
}

/// Current balance of one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account owner.
    pub user_id: String,
    /// Balance in minor units (e.g. cents). Never negative.
    pub balance_minor_units: i64,
    /// Currency code.
    pub currency: String,
}

/// Immutable, append-only record of one balance change.
///
/// Created only by [`super::Ledger`] operations; never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Transaction ID.
    pub id: String,
    /// Account owner.
    pub user_id: String,
    /// Credit or debit.
    pub kind: TxKind,
    /// Amount moved, in minor units. Always positive.
    pub amount_minor_units: i64,
    /// Balance after this transaction was applied.
    pub balance_after: i64,
    /// Business reason for the movement.
    pub reason: TxReason,
    /// Free-form context (e.g. the bet ID that triggered it).
    pub metadata: serde_json::Value,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

//! Bet types and the bet state machine.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

use crate::selection::Selection;

/// Overall bet status.
///
/// A bet starts `Pending` and moves to exactly one terminal state through
/// the settlement processor. Terminal bets are immutable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    /// Awaiting results.
    #[default]
    #[strum(serialize = "pending")]
    Pending,
    /// All legs won; winnings credited.
    #[strum(serialize = "won")]
    Won,
    /// At least one leg lost.
    #[strum(serialize = "lost")]
    Lost,
    /// All legs voided.
    #[strum(serialize = "void")]
    Void,
}

impl BetStatus {
    /// Check if status is terminal (won't change).
    pub fn is_terminal(&self) -> bool {
        matches!(self, BetStatus::Won | BetStatus::Lost | BetStatus::Void)
    }
}

/// A placed bet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    /// Bet ID.
    pub id: String,
    /// Account that placed the bet.
    pub user_id: String,
    /// Ordered legs, at most one per event.
    pub selections: Vec<Selection>,
    /// Stake in minor units. Always positive.
    pub stake_minor_units: i64,
    /// Product of selection prices, 4 decimal places.
    pub combined_odds: Decimal,
    /// `floor(stake * combined_odds)` in minor units.
    pub potential_win_minor_units: i64,
    /// Current lifecycle status.
    pub status: BetStatus,
    /// When the bet was placed.
    pub created_at: OffsetDateTime,
    /// When the bet was last updated.
    pub updated_at: OffsetDateTime,
}

impl Bet {
    /// Potential winnings for a stake at the given combined odds:
    /// `floor(stake * odds)` in minor units. `None` if the product does not
    /// fit an `i64`.
    pub fn potential_win(stake_minor_units: i64, combined_odds: Decimal) -> Option<i64> {
        Decimal::from(stake_minor_units)
            .checked_mul(combined_odds)?
            .floor()
            .to_i64()
    }
}

/// Receipt returned to the caller after a successful placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetReceipt {
    /// The new bet's ID.
    pub bet_id: String,
    /// Combined odds across all legs.
    pub combined_odds: Decimal,
    /// Stake debited, in minor units.
    pub stake_minor_units: i64,
    /// Potential winnings, in minor units.
    pub potential_win_minor_units: i64,
    /// Account currency.
    pub currency: String,
    /// Balance after the stake debit.
    pub balance_after: i64,
}

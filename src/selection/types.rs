//! Selection types and market kinds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Market kinds the engine knows how to settle.
///
/// Resolved once from the free-form market label during normalization, so
/// the outcome evaluator dispatches on a closed enum instead of matching
/// label substrings at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    /// Match winner (1X2).
    #[strum(serialize = "head_to_head")]
    HeadToHead,
    /// Total goals over/under a line.
    #[strum(serialize = "totals")]
    Totals,
    /// Both teams to score.
    #[strum(serialize = "both_teams_to_score")]
    BothTeamsToScore,
    /// Draw no bet.
    #[strum(serialize = "draw_no_bet")]
    DrawNoBet,
    /// Double chance.
    #[strum(serialize = "double_chance")]
    DoubleChance,
    /// Anything the evaluator does not auto-resolve.
    #[strum(serialize = "other")]
    Other,
}

impl MarketKind {
    /// Resolve a free-form market label into a market kind.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_ascii_lowercase();

        if label.contains("1x2") || label.contains("h2h") || label.contains("head") {
            MarketKind::HeadToHead
        } else if label.contains("draw no bet") || label.contains("dnb") {
            MarketKind::DrawNoBet
        } else if label.contains("double chance") {
            MarketKind::DoubleChance
        } else if label.contains("over") || label.contains("under") || label.contains("total") {
            MarketKind::Totals
        } else if label.contains("both") || label.contains("btts") {
            MarketKind::BothTeamsToScore
        } else {
            MarketKind::Other
        }
    }
}

/// Per-leg settlement status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStatus {
    /// Not yet resolved.
    #[default]
    #[strum(serialize = "pending")]
    Pending,
    /// Leg won.
    #[strum(serialize = "won")]
    Won,
    /// Leg lost.
    #[strum(serialize = "lost")]
    Lost,
    /// Leg voided.
    #[strum(serialize = "void")]
    Void,
}

/// Head-to-head winner codes. Accepts both word and 1X2 spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Winner {
    /// Home win.
    #[strum(serialize = "home", serialize = "1")]
    Home,
    /// Draw.
    #[strum(serialize = "draw", serialize = "x")]
    Draw,
    /// Away win.
    #[strum(serialize = "away", serialize = "2")]
    Away,
}

/// Over/under side of a totals market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum TotalsSide {
    /// Total above the line wins.
    #[strum(serialize = "over", serialize = "o")]
    Over,
    /// Total below the line wins.
    #[strum(serialize = "under", serialize = "u")]
    Under,
}

/// A candidate selection as submitted by a caller, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSelection {
    /// Fixture/event identifier.
    #[serde(default)]
    pub event_id: String,
    /// Free-form market label (e.g. "Match result (1X2)").
    #[serde(default)]
    pub market: String,
    /// Outcome being backed (e.g. "home", "over", "yes").
    #[serde(default)]
    pub outcome_key: String,
    /// Decimal odds.
    #[serde(default)]
    pub price: f64,
    /// Market line for totals (e.g. "2.5").
    #[serde(default)]
    pub line: Option<String>,
    /// Bookmaker offering the price.
    #[serde(default)]
    pub bookmaker: Option<String>,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
    /// Home team name.
    #[serde(default)]
    pub home: Option<String>,
    /// Away team name.
    #[serde(default)]
    pub away: Option<String>,
}

/// One validated leg of a bet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    /// Fixture/event identifier. Unique within a bet.
    pub event_id: String,
    /// Resolved market kind.
    pub market: MarketKind,
    /// Original market label, kept for display.
    pub market_label: String,
    /// Outcome being backed.
    pub outcome_key: String,
    /// Decimal odds, rounded to [`super::PRICE_DECIMALS`] places.
    pub price: Decimal,
    /// Market line for totals, parsed lazily at evaluation time.
    pub line: Option<String>,
    /// Bookmaker offering the price.
    pub bookmaker: Option<String>,
    /// Display label.
    pub label: String,
    /// Home team name.
    pub home: Option<String>,
    /// Away team name.
    pub away: Option<String>,
    /// Final home goals, once known.
    pub goals_home: Option<i64>,
    /// Final away goals, once known.
    pub goals_away: Option<i64>,
    /// Final score display string, once known.
    pub final_score: Option<String>,
    /// Per-leg settlement status.
    #[serde(default)]
    pub status: SelectionStatus,
}

/// Final-score data for one selection, as posted by the score feed.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionScore {
    /// Fixture/event the score belongs to.
    pub event_id: String,
    /// Final home goals.
    #[serde(default)]
    pub goals_home: Option<i64>,
    /// Final away goals.
    #[serde(default)]
    pub goals_away: Option<i64>,
    /// Final score display string.
    #[serde(default)]
    pub final_score: Option<String>,
}

//! Selection validation, dedup, and combined-odds aggregation.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::instrument;

use super::types::{MarketKind, RawSelection, Selection, SelectionStatus};
use crate::error::BetError;

/// Decimal places kept on prices and combined odds.
pub const PRICE_DECIMALS: u32 = 4;

/// Validate and deduplicate raw selections.
///
/// Enforces the placement contract: at least one selection, non-empty
/// `event_id`/`market`/`outcome_key`, a finite price >= 1, at most one
/// selection per event (a later entry replaces an earlier one for the same
/// event), and at most `max` selections after deduplication. Prices are
/// rounded to [`PRICE_DECIMALS`] places and market labels resolved to a
/// [`MarketKind`] here, once.
#[instrument(skip(raw), fields(candidates = raw.len()))]
pub fn normalize_selections(raw: &[RawSelection], max: usize) -> Result<Vec<Selection>, BetError> {
    if raw.is_empty() {
        return Err(BetError::EmptySelections);
    }

    let mut out: Vec<Selection> = Vec::with_capacity(raw.len());

    for r in raw {
        let event_id = r.event_id.trim().to_string();
        let market_label = r.market.trim().to_string();
        let outcome_key = r.outcome_key.trim().to_string();

        if event_id.is_empty() {
            return Err(BetError::InvalidSelection { field: "event_id" });
        }
        if market_label.is_empty() {
            return Err(BetError::InvalidSelection { field: "market" });
        }
        if outcome_key.is_empty() {
            return Err(BetError::InvalidSelection {
                field: "outcome_key",
            });
        }

        // from_f64 rejects NaN and infinities.
        let price = Decimal::from_f64(r.price)
            .filter(|p| *p >= Decimal::ONE)
            .ok_or(BetError::InvalidSelection { field: "price" })?
            .round_dp(PRICE_DECIMALS);

        // One selection per event: last write wins within a submission.
        if let Some(idx) = out.iter().position(|s| s.event_id == event_id) {
            out.remove(idx);
        }

        out.push(Selection {
            market: MarketKind::from_label(&market_label),
            label: r
                .label
                .clone()
                .unwrap_or_else(|| format!("{} @ {}", outcome_key, price)),
            event_id,
            market_label,
            outcome_key,
            price,
            line: r.line.clone(),
            bookmaker: r.bookmaker.clone(),
            home: r.home.clone(),
            away: r.away.clone(),
            goals_home: None,
            goals_away: None,
            final_score: None,
            status: SelectionStatus::Pending,
        });
    }

    if out.len() > max {
        return Err(BetError::TooManySelections {
            count: out.len(),
            max,
        });
    }

    Ok(out)
}

/// Combined odds: the product of all selection prices, rounded to
/// [`PRICE_DECIMALS`] places. A single-leg bet keeps its price unchanged.
pub fn combined_odds(selections: &[Selection]) -> Result<Decimal, BetError> {
    let mut odds = Decimal::ONE;
    for s in selections {
        odds = odds.checked_mul(s.price).ok_or(BetError::OddsOverflow {
            legs: selections.len(),
        })?;
    }
    Ok(odds.round_dp(PRICE_DECIMALS))
}

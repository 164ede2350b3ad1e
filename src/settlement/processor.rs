//! Idempotent settlement: terminal transitions, winnings credit, archive.

use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use super::evaluator::compute_overall_status;
use crate::bet::store::BetStore;
use crate::bet::types::{Bet, BetStatus};
use crate::error::{BetError, EngineError};
use crate::ledger::{Ledger, TxReason};
use crate::metrics;
use crate::selection::Selection;

/// Immutable snapshot of a bet at the moment it reached a terminal state.
///
/// Existence of an entry for a `bet_id` is the idempotency guard against
/// double settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettledBet {
    /// The settled bet's ID.
    pub bet_id: String,
    /// Account that placed the bet.
    pub user_id: String,
    /// Legs with their final statuses.
    pub selections: Vec<Selection>,
    /// Stake in minor units.
    pub stake_minor_units: i64,
    /// Potential winnings in minor units.
    pub potential_win_minor_units: i64,
    /// Combined odds.
    pub combined_odds: Decimal,
    /// Terminal status the bet reached.
    pub status: BetStatus,
    /// When the snapshot was archived.
    pub archived_at: OffsetDateTime,
}

impl SettledBet {
    fn snapshot(bet: &Bet) -> Self {
        Self {
            bet_id: bet.id.clone(),
            user_id: bet.user_id.clone(),
            selections: bet.selections.clone(),
            stake_minor_units: bet.stake_minor_units,
            potential_win_minor_units: bet.potential_win_minor_units,
            combined_odds: bet.combined_odds,
            status: bet.status,
            archived_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Drives bets from `pending` to a terminal state exactly once.
///
/// All of the guard checks and the status write happen under the bet's
/// exclusive store entry, so two concurrent triggers for the same bet
/// serialize and the loser sees the archive entry and does nothing.
#[derive(Debug)]
pub struct SettlementProcessor {
    ledger: Arc<Ledger>,
    store: Arc<BetStore>,
    archive: DashMap<String, SettledBet>,
}

impl SettlementProcessor {
    /// Create a processor over the shared ledger and bet store.
    pub fn new(ledger: Arc<Ledger>, store: Arc<BetStore>) -> Self {
        Self {
            ledger,
            store,
            archive: DashMap::new(),
        }
    }

    /// Apply the terminal transition for a bet whose legs have been
    /// evaluated. Safe to call repeatedly: duplicate triggers are absorbed
    /// as no-ops, and a failed winnings credit leaves the bet pending so
    /// the whole transition can be retried.
    #[instrument(skip(self), fields(bet_id = %bet_id))]
    pub fn settle(&self, bet_id: &str) -> Result<Bet, EngineError> {
        let started = Instant::now();

        let mut entry = self.store.entry_mut(bet_id).ok_or(BetError::BetNotFound {
            bet_id: bet_id.to_string(),
        })?;

        if self.archive.contains_key(bet_id) {
            debug!("bet already settled, ignoring duplicate trigger");
            return Ok(entry.value().clone());
        }

        if entry.status.is_terminal() {
            // Committed on an earlier attempt whose archive write never
            // landed; retry just the snapshot.
            self.archive
                .insert(bet_id.to_string(), SettledBet::snapshot(&entry));
            return Ok(entry.value().clone());
        }

        let overall = compute_overall_status(&entry.selections);
        if !overall.is_terminal() {
            debug!(status = %overall, "bet not yet resolvable");
            return Ok(entry.value().clone());
        }

        if overall == BetStatus::Won {
            // Credit before the status flip: if the ledger rejects the
            // credit the bet stays pending and the transition is retried.
            self.ledger.credit(
                &entry.user_id,
                entry.potential_win_minor_units,
                TxReason::BetWin,
                json!({ "bet_id": bet_id }),
            )?;
        }

        entry.status = overall;
        entry.updated_at = OffsetDateTime::now_utc();
        self.archive
            .insert(bet_id.to_string(), SettledBet::snapshot(&entry));

        metrics::inc_bets_settled(overall);
        metrics::record_settlement_latency(started);
        info!(status = %overall, "bet settled");

        Ok(entry.value().clone())
    }

    /// Archive entry for one bet, if it has settled.
    pub fn archived(&self, bet_id: &str) -> Option<SettledBet> {
        self.archive.get(bet_id).map(|s| s.value().clone())
    }

    /// A user's settled bets, newest first.
    pub fn history_for_user(&self, user_id: &str) -> Vec<SettledBet> {
        let mut settled: Vec<SettledBet> = self
            .archive
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.value().clone())
            .collect();
        settled.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
        settled
    }

    /// Number of settled bets in the archive.
    pub fn settled_count(&self) -> usize {
        self.archive.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TxKind;
    use crate::selection::types::{MarketKind, SelectionStatus};
    use rust_decimal_macros::dec;

    fn components() -> (Arc<Ledger>, Arc<BetStore>, SettlementProcessor) {
        let ledger = Arc::new(Ledger::new("TND"));
        let store = Arc::new(BetStore::new());
        let processor = SettlementProcessor::new(ledger.clone(), store.clone());
        (ledger, store, processor)
    }

    fn leg(status: SelectionStatus) -> Selection {
        Selection {
            event_id: "ev1".to_string(),
            market: MarketKind::HeadToHead,
            market_label: "Match result (1X2)".to_string(),
            outcome_key: "home".to_string(),
            price: dec!(2.5),
            line: None,
            bookmaker: None,
            label: "home @ 2.5".to_string(),
            home: None,
            away: None,
            goals_home: Some(2),
            goals_away: Some(1),
            final_score: Some("2 - 1".to_string()),
            status,
        }
    }

    fn pending_bet(id: &str, status: SelectionStatus) -> Bet {
        Bet {
            id: id.to_string(),
            user_id: "alice".to_string(),
            selections: vec![leg(status)],
            stake_minor_units: 1_000,
            combined_odds: dec!(2.5),
            potential_win_minor_units: 2_500,
            status: BetStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn won_bet_credits_winnings_once() {
        let (ledger, store, processor) = components();
        store.insert(pending_bet("b1", SelectionStatus::Won)).unwrap();

        let settled = processor.settle("b1").unwrap();
        assert_eq!(settled.status, BetStatus::Won);
        assert_eq!(ledger.balance("alice").balance_minor_units, 2_500);

        // Settling again is a no-op: one credit, one archive entry.
        let again = processor.settle("b1").unwrap();
        assert_eq!(again.status, BetStatus::Won);
        assert_eq!(ledger.balance("alice").balance_minor_units, 2_500);
        assert_eq!(processor.settled_count(), 1);

        let wins: Vec<_> = ledger
            .transactions("alice")
            .into_iter()
            .filter(|t| t.kind == TxKind::Credit && t.reason == TxReason::BetWin)
            .collect();
        assert_eq!(wins.len(), 1);
        assert_eq!(wins[0].metadata, serde_json::json!({ "bet_id": "b1" }));
    }

    #[test]
    fn lost_bet_settles_without_credit() {
        let (ledger, store, processor) = components();
        store
            .insert(pending_bet("b1", SelectionStatus::Lost))
            .unwrap();

        let settled = processor.settle("b1").unwrap();
        assert_eq!(settled.status, BetStatus::Lost);
        assert_eq!(ledger.balance("alice").balance_minor_units, 0);
        assert!(ledger.transactions("alice").is_empty());
        assert_eq!(processor.settled_count(), 1);
    }

    #[test]
    fn void_bet_settles_without_credit() {
        let (ledger, store, processor) = components();
        store
            .insert(pending_bet("b1", SelectionStatus::Void))
            .unwrap();

        let settled = processor.settle("b1").unwrap();
        assert_eq!(settled.status, BetStatus::Void);
        assert_eq!(ledger.balance("alice").balance_minor_units, 0);
    }

    #[test]
    fn unresolved_bet_stays_pending() {
        let (_ledger, store, processor) = components();
        store
            .insert(pending_bet("b1", SelectionStatus::Pending))
            .unwrap();

        let bet = processor.settle("b1").unwrap();
        assert_eq!(bet.status, BetStatus::Pending);
        assert_eq!(processor.settled_count(), 0);
    }

    #[test]
    fn unknown_bet_is_an_error() {
        let (_ledger, _store, processor) = components();

        assert!(matches!(
            processor.settle("nope"),
            Err(EngineError::Bet(BetError::BetNotFound { .. }))
        ));
    }

    #[test]
    fn history_is_per_user_newest_first() {
        let (_ledger, store, processor) = components();
        store.insert(pending_bet("b1", SelectionStatus::Won)).unwrap();
        store
            .insert(pending_bet("b2", SelectionStatus::Lost))
            .unwrap();
        let mut other = pending_bet("b3", SelectionStatus::Lost);
        other.user_id = "bob".to_string();
        store.insert(other).unwrap();

        processor.settle("b1").unwrap();
        processor.settle("b2").unwrap();
        processor.settle("b3").unwrap();

        let history = processor.history_for_user("alice");
        assert_eq!(history.len(), 2);
        assert!(processor.archived("b3").is_some());
        assert!(history.iter().all(|s| s.user_id == "alice"));
    }
}

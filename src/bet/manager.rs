//! Bet lifecycle: placement, score updates, and read projections.

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::store::BetStore;
use super::types::{Bet, BetReceipt, BetStatus};
use crate::error::{BetError, EngineError};
use crate::ledger::{Ledger, TxReason};
use crate::metrics;
use crate::selection::normalizer::{combined_odds, normalize_selections};
use crate::selection::types::{RawSelection, SelectionScore};
use crate::settlement::evaluator::{compute_overall_status, evaluate_selection};
use crate::settlement::SettlementProcessor;

/// Coordinates the ledger, the bet store, and the settlement processor.
#[derive(Debug)]
pub struct BetManager {
    ledger: Arc<Ledger>,
    store: Arc<BetStore>,
    settlement: Arc<SettlementProcessor>,
    max_selections: usize,
}

impl BetManager {
    /// Create a manager over the shared components.
    pub fn new(
        ledger: Arc<Ledger>,
        store: Arc<BetStore>,
        settlement: Arc<SettlementProcessor>,
        max_selections: usize,
    ) -> Self {
        Self {
            ledger,
            store,
            settlement,
            max_selections,
        }
    }

    /// Place a bet: validate selections and stake, debit the stake, and
    /// persist the pending bet.
    ///
    /// The debit and the bet insert form one failure boundary: nothing is
    /// committed on a validation failure or an insufficient balance, and if
    /// the insert itself fails the stake debit is reversed before the error
    /// propagates. A debit can never exist without its bet.
    #[instrument(skip(self, raw_selections), fields(user_id = %user_id, stake = stake_minor_units))]
    pub fn place_bet(
        &self,
        user_id: &str,
        stake_minor_units: i64,
        raw_selections: &[RawSelection],
    ) -> Result<BetReceipt, EngineError> {
        let started = Instant::now();

        let selections = normalize_selections(raw_selections, self.max_selections)?;

        if stake_minor_units <= 0 {
            return Err(BetError::InvalidStake {
                stake: stake_minor_units,
            }
            .into());
        }

        let odds = combined_odds(&selections)?;
        let potential_win_minor_units =
            Bet::potential_win(stake_minor_units, odds).ok_or(BetError::OddsOverflow {
                legs: selections.len(),
            })?;

        let bet_id = Uuid::new_v4().to_string();
        let balance = self.ledger.debit_if_sufficient(
            user_id,
            stake_minor_units,
            TxReason::BetPlace,
            json!({ "bet_id": bet_id }),
        )?;

        let now = OffsetDateTime::now_utc();
        let bet = Bet {
            id: bet_id.clone(),
            user_id: user_id.to_string(),
            selections,
            stake_minor_units,
            combined_odds: odds,
            potential_win_minor_units,
            status: BetStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        if let Err(err) = self.store.insert(bet) {
            // Compensate the debit so the failed placement leaves no trace.
            error!(error = %err, "bet insert failed after stake debit, reversing");
            self.ledger.credit(
                user_id,
                stake_minor_units,
                TxReason::BetPlaceReversal,
                json!({ "bet_id": bet_id }),
            )?;
            return Err(err.into());
        }

        metrics::inc_bets_placed();
        metrics::record_place_bet_latency(started);
        info!(
            bet_id = %bet_id,
            combined_odds = %odds,
            potential_win = potential_win_minor_units,
            "bet placed"
        );

        Ok(BetReceipt {
            bet_id,
            combined_odds: odds,
            stake_minor_units,
            potential_win_minor_units,
            currency: balance.currency,
            balance_after: balance.balance_minor_units,
        })
    }

    /// Apply final-score data from the score feed to a bet's selections and
    /// settle the bet if the results make it terminal.
    ///
    /// Terminal bets are immutable: the update is a no-op returning the
    /// unchanged record. Scores are merged onto existing selections by
    /// `event_id`; stake, prices, and markets are never touched through
    /// this path.
    #[instrument(skip(self, scores), fields(bet_id = %bet_id, events = scores.len()))]
    pub fn apply_scores(
        &self,
        bet_id: &str,
        scores: &[SelectionScore],
    ) -> Result<Bet, EngineError> {
        let overall = {
            let mut entry = self.store.entry_mut(bet_id).ok_or(BetError::BetNotFound {
                bet_id: bet_id.to_string(),
            })?;

            if entry.status.is_terminal() {
                info!(status = %entry.status, "bet already finalized, ignoring update");
                return Ok(entry.value().clone());
            }

            for score in scores {
                let Some(sel) = entry
                    .selections
                    .iter_mut()
                    .find(|s| s.event_id == score.event_id)
                else {
                    warn!(event_id = %score.event_id, "score for unknown event, skipping");
                    continue;
                };

                sel.goals_home = score.goals_home.or(sel.goals_home);
                sel.goals_away = score.goals_away.or(sel.goals_away);
                if let Some(final_score) = &score.final_score {
                    sel.final_score = Some(final_score.clone());
                } else if let (Some(h), Some(a)) = (sel.goals_home, sel.goals_away) {
                    sel.final_score = Some(format!("{h} - {a}"));
                }
                sel.status = evaluate_selection(sel);
            }

            entry.updated_at = OffsetDateTime::now_utc();
            compute_overall_status(&entry.selections)
            // Entry guard dropped here; the settlement processor takes its
            // own exclusive pass over the bet.
        };

        if overall.is_terminal() {
            return self.settlement.settle(bet_id);
        }

        self.store.get(bet_id).ok_or_else(|| {
            BetError::BetNotFound {
                bet_id: bet_id.to_string(),
            }
            .into()
        })
    }

    /// Snapshot of one bet.
    pub fn get(&self, bet_id: &str) -> Result<Bet, EngineError> {
        self.store.get(bet_id).ok_or_else(|| {
            BetError::BetNotFound {
                bet_id: bet_id.to_string(),
            }
            .into()
        })
    }

    /// A user's bets, newest first.
    pub fn bets_for_user(&self, user_id: &str) -> Vec<Bet> {
        self.store.for_user(user_id)
    }

    /// Number of bets that have not yet settled.
    pub fn open_bet_count(&self) -> usize {
        self.store
            .len()
            .saturating_sub(self.settlement.settled_count())
    }
}

//! Outcome evaluation: final scores in, selection and bet statuses out.
//!
//! Everything here is a pure function of its inputs. A selection without a
//! complete final score stays `Pending`; markets the engine does not settle
//! are never auto-resolved.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::bet::types::BetStatus;
use crate::selection::types::{MarketKind, Selection, SelectionStatus, TotalsSide, Winner};

/// Evaluate one selection against whatever score data it carries.
pub fn evaluate_selection(sel: &Selection) -> SelectionStatus {
    let (home, away) = match (sel.goals_home, sel.goals_away) {
        (Some(home), Some(away)) => (home, away),
        _ => return SelectionStatus::Pending,
    };

    match sel.market {
        MarketKind::HeadToHead => {
            let winner = if home > away {
                Winner::Home
            } else if away > home {
                Winner::Away
            } else {
                Winner::Draw
            };

            match parse_key::<Winner>(&sel.outcome_key) {
                Some(key) if key == winner => SelectionStatus::Won,
                _ => SelectionStatus::Lost,
            }
        }
        MarketKind::Totals => {
            let line = match sel
                .line
                .as_deref()
                .and_then(|l| Decimal::from_str(l.trim()).ok())
            {
                Some(line) => line,
                None => return SelectionStatus::Pending,
            };
            let total = Decimal::from(home + away);

            // A total exactly on the line loses for both sides.
            match parse_key::<TotalsSide>(&sel.outcome_key) {
                Some(TotalsSide::Over) if total > line => SelectionStatus::Won,
                Some(TotalsSide::Under) if total < line => SelectionStatus::Won,
                _ => SelectionStatus::Lost,
            }
        }
        MarketKind::BothTeamsToScore => {
            let both_scored = home > 0 && away > 0;
            let expect_yes = matches!(
                sel.outcome_key.trim().to_ascii_lowercase().as_str(),
                "yes" | "y"
            );

            if both_scored == expect_yes {
                SelectionStatus::Won
            } else {
                SelectionStatus::Lost
            }
        }
        // Draw-no-bet, double-chance, and unrecognized markets are left for
        // manual resolution.
        MarketKind::DrawNoBet | MarketKind::DoubleChance | MarketKind::Other => {
            SelectionStatus::Pending
        }
    }
}

/// Aggregate per-leg statuses into an overall bet status.
///
/// Priority order: any lost leg loses the bet; otherwise all legs won wins
/// it; otherwise all legs void voids it; anything else stays pending.
pub fn compute_overall_status(selections: &[Selection]) -> BetStatus {
    if selections.iter().any(|s| s.status == SelectionStatus::Lost) {
        return BetStatus::Lost;
    }
    if !selections.is_empty() && selections.iter().all(|s| s.status == SelectionStatus::Won) {
        return BetStatus::Won;
    }
    if !selections.is_empty() && selections.iter().all(|s| s.status == SelectionStatus::Void) {
        return BetStatus::Void;
    }
    BetStatus::Pending
}

fn parse_key<T: FromStr>(key: &str) -> Option<T> {
    key.trim().to_ascii_lowercase().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(market: MarketKind, outcome_key: &str) -> Selection {
        Selection {
            event_id: "ev1".to_string(),
            market,
            market_label: String::new(),
            outcome_key: outcome_key.to_string(),
            price: Decimal::TWO,
            line: None,
            bookmaker: None,
            label: String::new(),
            home: None,
            away: None,
            goals_home: None,
            goals_away: None,
            final_score: None,
            status: SelectionStatus::Pending,
        }
    }

    fn scored(market: MarketKind, outcome_key: &str, home: i64, away: i64) -> Selection {
        let mut sel = selection(market, outcome_key);
        sel.goals_home = Some(home);
        sel.goals_away = Some(away);
        sel
    }

    fn with_status(status: SelectionStatus) -> Selection {
        let mut sel = selection(MarketKind::HeadToHead, "home");
        sel.status = status;
        sel
    }

    #[test]
    fn missing_score_stays_pending() {
        let mut sel = selection(MarketKind::HeadToHead, "home");
        assert_eq!(evaluate_selection(&sel), SelectionStatus::Pending);

        sel.goals_home = Some(2);
        assert_eq!(evaluate_selection(&sel), SelectionStatus::Pending);
    }

    #[test]
    fn head_to_head_resolves_winner() {
        assert_eq!(
            evaluate_selection(&scored(MarketKind::HeadToHead, "home", 2, 1)),
            SelectionStatus::Won
        );
        assert_eq!(
            evaluate_selection(&scored(MarketKind::HeadToHead, "away", 2, 1)),
            SelectionStatus::Lost
        );
        assert_eq!(
            evaluate_selection(&scored(MarketKind::HeadToHead, "draw", 1, 1)),
            SelectionStatus::Won
        );
        // 1X2 spellings work too.
        assert_eq!(
            evaluate_selection(&scored(MarketKind::HeadToHead, "1", 3, 0)),
            SelectionStatus::Won
        );
        assert_eq!(
            evaluate_selection(&scored(MarketKind::HeadToHead, "X", 0, 0)),
            SelectionStatus::Won
        );
        // An unknown key cannot name the winner.
        assert_eq!(
            evaluate_selection(&scored(MarketKind::HeadToHead, "banker", 2, 1)),
            SelectionStatus::Lost
        );
    }

    #[test]
    fn totals_compare_against_line() {
        let mut over = scored(MarketKind::Totals, "over", 2, 1);
        over.line = Some("2.5".to_string());
        assert_eq!(evaluate_selection(&over), SelectionStatus::Won);

        let mut under = scored(MarketKind::Totals, "under", 2, 1);
        under.line = Some("2.5".to_string());
        assert_eq!(evaluate_selection(&under), SelectionStatus::Lost);
    }

    #[test]
    fn totals_push_loses_both_sides() {
        for key in ["over", "under"] {
            let mut sel = scored(MarketKind::Totals, key, 1, 1);
            sel.line = Some("2".to_string());
            assert_eq!(evaluate_selection(&sel), SelectionStatus::Lost);
        }
    }

    #[test]
    fn totals_without_parseable_line_stays_pending() {
        let no_line = scored(MarketKind::Totals, "over", 2, 1);
        assert_eq!(evaluate_selection(&no_line), SelectionStatus::Pending);

        let mut bad_line = scored(MarketKind::Totals, "over", 2, 1);
        bad_line.line = Some("two and a half".to_string());
        assert_eq!(evaluate_selection(&bad_line), SelectionStatus::Pending);
    }

    #[test]
    fn both_teams_to_score() {
        assert_eq!(
            evaluate_selection(&scored(MarketKind::BothTeamsToScore, "yes", 2, 1)),
            SelectionStatus::Won
        );
        assert_eq!(
            evaluate_selection(&scored(MarketKind::BothTeamsToScore, "yes", 2, 0)),
            SelectionStatus::Lost
        );
        assert_eq!(
            evaluate_selection(&scored(MarketKind::BothTeamsToScore, "no", 2, 0)),
            SelectionStatus::Won
        );
        assert_eq!(
            evaluate_selection(&scored(MarketKind::BothTeamsToScore, "no", 1, 1)),
            SelectionStatus::Lost
        );
    }

    #[test]
    fn unsettleable_markets_stay_pending() {
        for market in [MarketKind::DrawNoBet, MarketKind::DoubleChance, MarketKind::Other] {
            assert_eq!(
                evaluate_selection(&scored(market, "home", 2, 1)),
                SelectionStatus::Pending
            );
        }
    }

    #[test]
    fn aggregation_priority() {
        use SelectionStatus::*;

        let lost_wins_priority = vec![with_status(Won), with_status(Lost), with_status(Pending)];
        assert_eq!(compute_overall_status(&lost_wins_priority), BetStatus::Lost);

        let all_won = vec![with_status(Won), with_status(Won)];
        assert_eq!(compute_overall_status(&all_won), BetStatus::Won);

        let all_void = vec![with_status(Void), with_status(Void)];
        assert_eq!(compute_overall_status(&all_void), BetStatus::Void);

        let won_and_pending = vec![with_status(Won), with_status(Pending)];
        assert_eq!(
            compute_overall_status(&won_and_pending),
            BetStatus::Pending
        );

        // A won/void mix without a lost leg is not yet terminal.
        let won_and_void = vec![with_status(Won), with_status(Void)];
        assert_eq!(compute_overall_status(&won_and_void), BetStatus::Pending);
    }
}

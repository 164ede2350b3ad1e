//! Concurrent bet storage with per-bet exclusive access.

use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;

use super::types::Bet;
use crate::error::BetError;

/// In-memory bet store. Sole owner of bet records.
///
/// `entry_mut` hands out an exclusive guard for one bet, which is the
/// single-writer serialization point for every status-affecting update on
/// that bet. Different bets never block each other.
#[derive(Debug, Default)]
pub struct BetStore {
    bets: DashMap<String, Bet>,
}

impl BetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly placed bet. Fails if the ID is already taken.
    pub fn insert(&self, bet: Bet) -> Result<(), BetError> {
        match self.bets.entry(bet.id.clone()) {
            Entry::Occupied(_) => Err(BetError::DuplicateBet { bet_id: bet.id }),
            Entry::Vacant(slot) => {
                slot.insert(bet);
                Ok(())
            }
        }
    }

    /// Snapshot of one bet.
    pub fn get(&self, bet_id: &str) -> Option<Bet> {
        self.bets.get(bet_id).map(|b| b.value().clone())
    }

    /// Exclusive access to one bet for read-modify-write updates.
    pub fn entry_mut(&self, bet_id: &str) -> Option<RefMut<'_, String, Bet>> {
        self.bets.get_mut(bet_id)
    }

    /// All bets for a user, newest first.
    pub fn for_user(&self, user_id: &str) -> Vec<Bet> {
        let mut bets: Vec<Bet> = self
            .bets
            .iter()
            .filter(|b| b.user_id == user_id)
            .map(|b| b.value().clone())
            .collect();
        bets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bets
    }

    /// Total number of bets held.
    pub fn len(&self) -> usize {
        self.bets.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }
}

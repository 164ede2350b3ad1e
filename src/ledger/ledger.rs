//! Account balance bookkeeping with an append-only transaction log.

use dashmap::DashMap;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::types::{AccountBalance, LedgerTransaction, TxKind, TxReason};
use crate::error::LedgerError;
use crate::metrics;

/// Role allowed to use [`Ledger::admin_credit`].
const ADMIN_ROLE: &str = "admin";

/// One account's mutable state. Balance and transaction log live under the
/// same map entry so a read-modify-write plus append is a single atomic unit.
#[derive(Debug)]
struct Account {
    balance_minor_units: i64,
    transactions: Vec<LedgerTransaction>,
}

impl Account {
    fn new() -> Self {
        Self {
            balance_minor_units: 0,
            transactions: Vec::new(),
        }
    }
}

/// The balance ledger. Sole owner of account balances and their history.
///
/// Mutations on one account are serialized by the exclusive map-entry guard;
/// operations on different accounts run concurrently.
#[derive(Debug)]
pub struct Ledger {
    accounts: DashMap<String, Account>,
    currency: String,
}

impl Ledger {
    /// Create an empty ledger for the given currency.
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            accounts: DashMap::new(),
            currency: currency.into(),
        }
    }

    /// Get an account's balance, creating a zero-balance account on first
    /// access. Never fails.
    pub fn balance(&self, user_id: &str) -> AccountBalance {
        let account = self
            .accounts
            .entry(user_id.to_string())
            .or_insert_with(Account::new);

        AccountBalance {
            user_id: user_id.to_string(),
            balance_minor_units: account.balance_minor_units,
            currency: self.currency.clone(),
        }
    }

    /// Credit an account. Fails with `InvalidAmount` if `amount <= 0`.
    #[instrument(skip(self, metadata), fields(user_id = %user_id, amount = amount, reason = %reason))]
    pub fn credit(
        &self,
        user_id: &str,
        amount: i64,
        reason: TxReason,
        metadata: Value,
    ) -> Result<AccountBalance, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount { amount });
        }

        let mut account = self
            .accounts
            .entry(user_id.to_string())
            .or_insert_with(Account::new);

        let balance_after = account
            .balance_minor_units
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount { amount })?;
        account.balance_minor_units = balance_after;
        account.transactions.push(Self::transaction(
            user_id,
            TxKind::Credit,
            amount,
            balance_after,
            reason,
            metadata,
        ));

        metrics::inc_ledger_transactions(TxKind::Credit);
        info!(balance_after = balance_after, "account credited");

        Ok(AccountBalance {
            user_id: user_id.to_string(),
            balance_minor_units: balance_after,
            currency: self.currency.clone(),
        })
    }

    /// Debit an account if the balance covers the amount.
    ///
    /// Fails with `InvalidAmount` if `amount <= 0` and `InsufficientFunds`
    /// if `amount` exceeds the current balance. On failure nothing is
    /// written; the balance can never go negative.
    #[instrument(skip(self, metadata), fields(user_id = %user_id, amount = amount, reason = %reason))]
    pub fn debit_if_sufficient(
        &self,
        user_id: &str,
        amount: i64,
        reason: TxReason,
        metadata: Value,
    ) -> Result<AccountBalance, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount { amount });
        }

        let mut account = self
            .accounts
            .entry(user_id.to_string())
            .or_insert_with(Account::new);

        if amount > account.balance_minor_units {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available: account.balance_minor_units,
            });
        }

        let balance_after = account.balance_minor_units - amount;
        account.balance_minor_units = balance_after;
        account.transactions.push(Self::transaction(
            user_id,
            TxKind::Debit,
            amount,
            balance_after,
            reason,
            metadata,
        ));

        metrics::inc_ledger_transactions(TxKind::Debit);
        info!(balance_after = balance_after, "account debited");

        Ok(AccountBalance {
            user_id: user_id.to_string(),
            balance_minor_units: balance_after,
            currency: self.currency.clone(),
        })
    }

    /// Credit another user's account. Restricted to the admin role.
    pub fn admin_credit(
        &self,
        caller_role: &str,
        target_user_id: &str,
        amount: i64,
        metadata: Value,
    ) -> Result<AccountBalance, LedgerError> {
        if caller_role != ADMIN_ROLE {
            return Err(LedgerError::Unauthorized {
                role: caller_role.to_string(),
            });
        }

        self.credit(target_user_id, amount, TxReason::AdminCredit, metadata)
    }

    /// An account's transactions, newest first.
    pub fn transactions(&self, user_id: &str) -> Vec<LedgerTransaction> {
        let mut txs = self
            .accounts
            .get(user_id)
            .map(|account| account.transactions.clone())
            .unwrap_or_default();
        txs.reverse();
        txs
    }

    /// Number of accounts the ledger has seen.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn transaction(
        user_id: &str,
        kind: TxKind,
        amount: i64,
        balance_after: i64,
        reason: TxReason,
        metadata: Value,
    ) -> LedgerTransaction {
        LedgerTransaction {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            kind,
            amount_minor_units: amount,
            balance_after,
            reason,
            metadata,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

//! In-memory ledger for the reference host.
//!
//! Tracks one `u64` balance per identity, including the contract's own
//! account. Every movement is journaled. All mutations are atomic: either
//! the full movement succeeds or no balance changes. Rollback replays the
//! journal backwards, so a checkpoint is just a journal position.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use escrow_contract::Ledger;
use escrow_types::{EscrowError, Identity, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of value movement recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// New supply credited to an account.
    Mint,
    /// Invocation value moved from the caller into the contract account.
    Attach,
    /// Contract account paid an identity.
    Transfer,
    /// Contract account value destroyed.
    Burn,
}

/// One journaled movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub from: Option<Identity>,
    pub to: Option<Identity>,
    pub amount: u64,
    pub recorded_at: DateTime<Utc>,
}

/// Restore point taken before an invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    journal_len: usize,
}

/// Balance book with a dedicated contract account.
pub struct InMemoryLedger {
    contract_account: Identity,
    balances: HashMap<Identity, u64>,
    journal: Vec<LedgerEntry>,
}

impl InMemoryLedger {
    /// Create an empty ledger whose contract account is `contract_account`.
    #[must_use]
    pub fn new(contract_account: Identity) -> Self {
        Self {
            contract_account,
            balances: HashMap::new(),
            journal: Vec::new(),
        }
    }

    #[must_use]
    pub fn contract_account(&self) -> Identity {
        self.contract_account
    }

    /// Create `amount` of new supply in `who`'s account.
    ///
    /// # Errors
    /// Returns `BalanceOverflow` if the account would exceed `u64::MAX`.
    pub fn mint(&mut self, who: Identity, amount: u64) -> Result<()> {
        let updated = self.checked_credit(who, amount)?;
        self.balances.insert(who, updated);
        self.record(EntryKind::Mint, None, Some(who), amount);
        Ok(())
    }

    /// Move invocation value from the caller into the contract account.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the caller cannot cover `amount`.
    pub fn attach(&mut self, caller: Identity, amount: u64) -> Result<()> {
        let contract = self.contract_account;
        self.move_value(caller, contract, amount)?;
        self.record(EntryKind::Attach, Some(caller), Some(contract), amount);
        Ok(())
    }

    #[must_use]
    pub fn balance(&self, who: Identity) -> u64 {
        self.balances.get(&who).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn contract_balance(&self) -> u64 {
        self.balance(self.contract_account)
    }

    /// Sum of every account, contract included.
    #[must_use]
    pub fn total_supply(&self) -> u128 {
        self.balances.values().map(|b| u128::from(*b)).sum()
    }

    #[must_use]
    pub fn journal(&self) -> &[LedgerEntry] {
        &self.journal
    }

    /// Journal entries of one kind, oldest first.
    pub fn entries(&self, kind: EntryKind) -> impl Iterator<Item = &LedgerEntry> {
        self.journal.iter().filter(move |e| e.kind == kind)
    }

    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            journal_len: self.journal.len(),
        }
    }

    /// Undo every movement journaled since `checkpoint`, newest first.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        let start = checkpoint.journal_len.min(self.journal.len());
        let undone = self.journal.split_off(start);
        for entry in undone.iter().rev() {
            if let Some(to) = entry.to {
                let balance = self.balance(to).saturating_sub(entry.amount);
                self.balances.insert(to, balance);
            }
            if let Some(from) = entry.from {
                let balance = self.balance(from).saturating_add(entry.amount);
                self.balances.insert(from, balance);
            }
        }
        tracing::debug!(undone = undone.len(), "Ledger rolled back");
    }

    fn checked_credit(&self, who: Identity, amount: u64) -> Result<u64> {
        self.balance(who)
            .checked_add(amount)
            .ok_or(EscrowError::BalanceOverflow { account: who })
    }

    fn checked_debit(&self, who: Identity, amount: u64) -> Result<u64> {
        let available = self.balance(who);
        available
            .checked_sub(amount)
            .ok_or(EscrowError::InsufficientBalance {
                account: who,
                needed: amount,
                available,
            })
    }

    fn move_value(&mut self, from: Identity, to: Identity, amount: u64) -> Result<()> {
        if from == to {
            self.checked_debit(from, amount)?;
            return Ok(());
        }
        let debited = self.checked_debit(from, amount)?;
        let credited = self.checked_credit(to, amount)?;
        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }

    fn record(&mut self, kind: EntryKind, from: Option<Identity>, to: Option<Identity>, amount: u64) {
        tracing::debug!(?kind, from = ?from, to = ?to, amount, "Ledger movement");
        self.journal.push(LedgerEntry {
            id: Uuid::now_v7(),
            kind,
            from,
            to,
            amount,
            recorded_at: Utc::now(),
        });
    }
}

impl Ledger for InMemoryLedger {
    fn transfer(&mut self, to: Identity, amount: u64) -> Result<()> {
        let from = self.contract_account;
        self.move_value(from, to, amount)?;
        self.record(EntryKind::Transfer, Some(from), Some(to), amount);
        Ok(())
    }

    fn burn(&mut self, amount: u64) -> Result<()> {
        let from = self.contract_account;
        let remaining = self.checked_debit(from, amount)?;
        self.balances.insert(from, remaining);
        self.record(EntryKind::Burn, Some(from), None, amount);
        Ok(())
    }
}

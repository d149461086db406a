//! Wallet exit tracker.
//!
//! ```text
//!  None ──request_exit──▶ Requested ──seq ≥ effective_at_seq──▶ Finalized
//!   ▲                                                              │
//!   └──────────────────────────── clear_exit ──────────────────────┘
//! ```
//!
//! A finalized exit blocks deposits, trades and dispatcher withdrawals for
//! the account, and unlocks self-withdrawal of its balances.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use settlex_types::{AccountId, LedgerError, Result};

/// Where an account is in the exit lifecycle at a given sequencer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitStatus {
    None,
    Requested { effective_at_seq: u64 },
    Finalized { effective_at_seq: u64 },
}

#[derive(Debug, Default)]
pub struct ExitTracker {
    /// Effective step per exited account.
    exits: HashMap<AccountId, u64>,
}

impl ExitTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an exit that becomes enforceable at `current_seq + delay`.
    ///
    /// # Errors
    /// Returns `AlreadyExited` if an exit is recorded and not cleared.
    pub fn request_exit(&mut self, account: AccountId, current_seq: u64, delay: u64) -> Result<u64> {
        if self.exits.contains_key(&account) {
            return Err(LedgerError::AlreadyExited(account));
        }
        let effective_at_seq = current_seq.saturating_add(delay);
        self.exits.insert(account, effective_at_seq);
        Ok(effective_at_seq)
    }

    #[must_use]
    pub fn status(&self, account: AccountId, current_seq: u64) -> ExitStatus {
        match self.exits.get(&account) {
            None => ExitStatus::None,
            Some(&effective_at_seq) if current_seq >= effective_at_seq => {
                ExitStatus::Finalized { effective_at_seq }
            }
            Some(&effective_at_seq) => ExitStatus::Requested { effective_at_seq },
        }
    }

    /// Whether the exit has taken effect.
    #[must_use]
    pub fn is_blocking(&self, account: AccountId, current_seq: u64) -> bool {
        matches!(self.status(account, current_seq), ExitStatus::Finalized { .. })
    }

    /// # Errors
    /// Returns `AccountExited` if the account's exit has taken effect.
    pub fn ensure_active(&self, account: AccountId, current_seq: u64) -> Result<()> {
        if self.is_blocking(account, current_seq) {
            return Err(LedgerError::AccountExited(account));
        }
        Ok(())
    }

    /// # Errors
    /// Returns `ExitNotFinalized` unless the exit has taken effect.
    pub fn assert_finalized(&self, account: AccountId, current_seq: u64) -> Result<()> {
        if self.is_blocking(account, current_seq) {
            Ok(())
        } else {
            Err(LedgerError::ExitNotFinalized)
        }
    }

    /// Reset the account to normal operation.
    ///
    /// # Errors
    /// Returns `NotExited` if no exit is recorded.
    pub fn clear_exit(&mut self, account: AccountId) -> Result<()> {
        self.exits
            .remove(&account)
            .map(|_| ())
            .ok_or(LedgerError::NotExited(account))
    }
}

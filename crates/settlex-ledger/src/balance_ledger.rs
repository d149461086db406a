//! Pip-denominated balance ledger.
//!
//! Tracks per-(account, asset) balances. Every mutation is atomic: either
//! the full operation succeeds or the balance is unchanged. Multi-leg
//! mutations go through [`BalanceLedger::apply`], which validates every
//! posting against a scratch overlay before touching stored balances.

use std::collections::HashMap;

use settlex_types::{AccountId, AssetId, LedgerError, Pips, Result};

/// One leg of a multi-leg balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posting {
    Credit {
        account: AccountId,
        asset: AssetId,
        amount: Pips,
    },
    Debit {
        account: AccountId,
        asset: AssetId,
        amount: Pips,
    },
}

impl Posting {
    fn key(&self) -> (AccountId, AssetId) {
        match *self {
            Self::Credit { account, asset, .. } | Self::Debit { account, asset, .. } => {
                (account, asset)
            }
        }
    }
}

/// Source of truth for every account's holdings.
#[derive(Debug, Default)]
pub struct BalanceLedger {
    balances: HashMap<(AccountId, AssetId), Pips>,
}

impl BalanceLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase a balance.
    ///
    /// # Errors
    /// Returns `Overflow` if the result exceeds the pip range.
    pub fn credit(&mut self, account: AccountId, asset: AssetId, amount: Pips) -> Result<Pips> {
        let updated = self
            .balance_of(account, asset)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.store(account, asset, updated);
        Ok(updated)
    }

    /// Decrease a balance.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `amount` exceeds the stored balance.
    pub fn debit(&mut self, account: AccountId, asset: AssetId, amount: Pips) -> Result<Pips> {
        let available = self.balance_of(account, asset);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            })?;
        self.store(account, asset, remaining);
        Ok(remaining)
    }

    /// Validate a batch of postings in order without mutating. Returns the
    /// resulting balance of every key touched.
    ///
    /// # Errors
    /// The first failing posting's error.
    pub fn preview(&self, postings: &[Posting]) -> Result<Vec<((AccountId, AssetId), Pips)>> {
        let mut overlay: Vec<((AccountId, AssetId), Pips)> = Vec::new();

        for posting in postings {
            let key = posting.key();
            let slot = match overlay.iter().position(|(k, _)| *k == key) {
                Some(i) => i,
                None => {
                    overlay.push((key, self.balance_of(key.0, key.1)));
                    overlay.len() - 1
                }
            };
            let current = overlay[slot].1;
            overlay[slot].1 = match *posting {
                Posting::Credit { amount, .. } => {
                    current.checked_add(amount).ok_or(LedgerError::Overflow)?
                }
                Posting::Debit { amount, .. } => {
                    current
                        .checked_sub(amount)
                        .ok_or(LedgerError::InsufficientBalance {
                            needed: amount,
                            available: current,
                        })?
                }
            };
        }
        Ok(overlay)
    }

    /// Apply a batch of postings atomically.
    ///
    /// # Errors
    /// The first failing posting's error. No posting is applied.
    pub fn apply(&mut self, postings: &[Posting]) -> Result<Vec<((AccountId, AssetId), Pips)>> {
        let overlay = self.preview(postings)?;
        for &((account, asset), balance) in &overlay {
            self.store(account, asset, balance);
        }
        Ok(overlay)
    }

    /// Remove and return the whole balance.
    pub fn take_all(&mut self, account: AccountId, asset: AssetId) -> Pips {
        self.balances.remove(&(account, asset)).unwrap_or(0)
    }

    #[must_use]
    pub fn balance_of(&self, account: AccountId, asset: AssetId) -> Pips {
        self.balances.get(&(account, asset)).copied().unwrap_or(0)
    }

    /// Sum of every account's balance in `asset`.
    #[must_use]
    pub fn total_supply(&self, asset: AssetId) -> u128 {
        self.balances
            .iter()
            .filter(|((_, a), _)| *a == asset)
            .map(|(_, amount)| u128::from(*amount))
            .sum()
    }

    /// Every asset with a non-zero balance somewhere.
    #[must_use]
    pub fn assets(&self) -> Vec<AssetId> {
        let mut assets: Vec<AssetId> = self.balances.keys().map(|(_, asset)| *asset).collect();
        assets.sort_unstable();
        assets.dedup();
        assets
    }

    fn store(&mut self, account: AccountId, asset: AssetId, amount: Pips) {
        if amount == 0 {
            self.balances.remove(&(account, asset));
        } else {
            self.balances.insert((account, asset), amount);
        }
    }
}

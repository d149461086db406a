//! Per-order fill progress.
//!
//! Each order can be exhausted only once: a completed hash is remembered
//! forever and any later fill against it fails with
//! [`LedgerError::OrderAlreadyComplete`]. Partial
//! progress is dropped on completion, so storage grows with completed
//! hashes only.
//!
//! Updates are two-phase. [`FillTracker::plan`] validates a fill and returns
//! a [`FillUpdate`] without mutating; [`FillTracker::commit`] applies it.
//! The engine plans both sides of a trade before committing either.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use settlex_types::{FillLimits, LedgerError, OrderHash, Pips, Result};

/// Cumulative quantities filled so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialFill {
    pub base: Pips,
    pub quote: Pips,
}

/// Externally visible progress of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillProgress {
    Untouched,
    Partial(PartialFill),
    Completed,
}

/// A validated, not yet applied, progress change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillUpdate {
    pub hash: OrderHash,
    pub filled: PartialFill,
    pub completes: bool,
}

#[derive(Debug, Default)]
pub struct FillTracker {
    partial: HashMap<OrderHash, PartialFill>,
    /// Never shrinks.
    completed: HashSet<OrderHash>,
}

impl FillTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate adding `base`/`quote` to the order's progress.
    ///
    /// # Errors
    /// - `OrderAlreadyComplete` if the hash is marked completed
    /// - `OrderOverfilled` if a cumulative total would exceed its limit
    pub fn plan(
        &self,
        hash: OrderHash,
        limits: FillLimits,
        base: Pips,
        quote: Pips,
    ) -> Result<FillUpdate> {
        if self.completed.contains(&hash) {
            return Err(LedgerError::OrderAlreadyComplete(hash));
        }

        let prior = self.partial.get(&hash).copied().unwrap_or_default();
        let overfilled = || LedgerError::OrderOverfilled { hash };
        let filled = PartialFill {
            base: prior.base.checked_add(base).ok_or_else(overfilled)?,
            quote: prior.quote.checked_add(quote).ok_or_else(overfilled)?,
        };

        if limits.base.is_some_and(|max| filled.base > max)
            || limits.quote.is_some_and(|max| filled.quote > max)
        {
            return Err(overfilled());
        }

        let completes = limits.base == Some(filled.base) || limits.quote == Some(filled.quote);
        Ok(FillUpdate {
            hash,
            filled,
            completes,
        })
    }

    /// Apply a planned update.
    pub fn commit(&mut self, update: FillUpdate) {
        if update.completes {
            self.partial.remove(&update.hash);
            self.completed.insert(update.hash);
        } else {
            self.partial.insert(update.hash, update.filled);
        }
    }

    #[must_use]
    pub fn progress(&self, hash: &OrderHash) -> FillProgress {
        if self.completed.contains(hash) {
            FillProgress::Completed
        } else {
            self.partial
                .get(hash)
                .map_or(FillProgress::Untouched, |p| FillProgress::Partial(*p))
        }
    }

    #[must_use]
    pub fn is_completed(&self, hash: &OrderHash) -> bool {
        self.completed.contains(hash)
    }

    /// Number of orders with partial progress.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.partial.len()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }
}

//! Processed-withdrawal guard.
//!
//! Each signed withdrawal can be processed only once. Unlike a bounded
//! cache, hashes are never evicted: a replay fails with
//! [`LedgerError::AlreadyWithdrawn`] no matter how much time has passed.

use std::collections::HashSet;

use settlex_types::{LedgerError, Result, WithdrawalHash};

#[derive(Debug, Default)]
pub struct WithdrawalRegistry {
    processed: HashSet<WithdrawalHash>,
}

impl WithdrawalRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns `AlreadyWithdrawn` if `hash` was processed before.
    pub fn ensure_unprocessed(&self, hash: &WithdrawalHash) -> Result<()> {
        if self.processed.contains(hash) {
            return Err(LedgerError::AlreadyWithdrawn(*hash));
        }
        Ok(())
    }

    /// Record `hash` as processed.
    ///
    /// # Errors
    /// Returns `AlreadyWithdrawn` if it already was.
    pub fn mark_processed(&mut self, hash: WithdrawalHash) -> Result<()> {
        if !self.processed.insert(hash) {
            return Err(LedgerError::AlreadyWithdrawn(hash));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_processed(&self, hash: &WithdrawalHash) -> bool {
        self.processed.contains(hash)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.processed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_withdrawal_ok() {
        let mut registry = WithdrawalRegistry::new();
        let hash = WithdrawalHash([1u8; 32]);
        assert!(registry.ensure_unprocessed(&hash).is_ok());
        registry.mark_processed(hash).unwrap();
        assert!(registry.is_processed(&hash));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn replay_blocked() {
        let mut registry = WithdrawalRegistry::new();
        let hash = WithdrawalHash([1u8; 32]);
        registry.mark_processed(hash).unwrap();

        let err = registry.mark_processed(hash).unwrap_err();
        assert!(
            matches!(err, LedgerError::AlreadyWithdrawn(h) if h == hash),
            "Expected AlreadyWithdrawn, got: {err:?}"
        );
        assert!(registry.ensure_unprocessed(&hash).is_err());
    }

    #[test]
    fn never_evicts() {
        let mut registry = WithdrawalRegistry::new();
        for i in 0..=255u8 {
            registry.mark_processed(WithdrawalHash([i; 32])).unwrap();
        }
        assert_eq!(registry.len(), 256);
        assert!(registry.is_processed(&WithdrawalHash([0u8; 32])));
    }

    #[test]
    fn empty_registry() {
        let registry = WithdrawalRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.is_processed(&WithdrawalHash([0u8; 32])));
    }
}

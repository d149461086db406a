//! Per-account nonce floors.
//!
//! An account invalidates every order it signed at or before a timestamp by
//! submitting a nonce carrying that timestamp. The floor only takes effect
//! once the sequencer reaches `effective_at_seq`, giving in-flight
//! settlements a propagation window. Floors are strictly increasing, and a
//! new one can only be recorded after the previous one took effect.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use settlex_types::{AccountId, LedgerError, Nonce, Result};

/// A recorded invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceInvalidation {
    pub nonce: Nonce,
    pub timestamp_ms: u64,
    pub effective_at_seq: u64,
    /// Floor that stays enforced until this one takes effect.
    pub superseded_floor_ms: u64,
}

#[derive(Debug, Default)]
pub struct InvalidationTracker {
    latest: HashMap<AccountId, NonceInvalidation>,
}

impl InvalidationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new invalidation for `account`.
    ///
    /// # Errors
    /// - `NotTimeOrderedNonce` if `nonce` is not a UUIDv7
    /// - `TimestampTooFarInFuture` if it lies beyond `now_ms + tolerance_ms`
    /// - `TimestampAlreadyInvalidated` if it does not exceed the last floor
    /// - `PreviousInvalidationPending` if the last floor is not yet effective
    pub fn invalidate(
        &mut self,
        account: AccountId,
        nonce: Nonce,
        now_ms: u64,
        tolerance_ms: u64,
        current_seq: u64,
        delay: u64,
    ) -> Result<NonceInvalidation> {
        let timestamp_ms = nonce.timestamp_ms()?;
        if timestamp_ms > now_ms.saturating_add(tolerance_ms) {
            return Err(LedgerError::TimestampTooFarInFuture {
                timestamp_ms,
                now_ms,
            });
        }

        let superseded_floor_ms = match self.latest.get(&account) {
            Some(prev) => {
                if timestamp_ms <= prev.timestamp_ms {
                    return Err(LedgerError::TimestampAlreadyInvalidated {
                        timestamp_ms,
                        last_ms: prev.timestamp_ms,
                    });
                }
                if prev.effective_at_seq > current_seq {
                    return Err(LedgerError::PreviousInvalidationPending {
                        effective_at_seq: prev.effective_at_seq,
                    });
                }
                prev.timestamp_ms
            }
            None => 0,
        };

        let record = NonceInvalidation {
            nonce,
            timestamp_ms,
            effective_at_seq: current_seq.saturating_add(delay),
            superseded_floor_ms,
        };
        self.latest.insert(account, record);
        Ok(record)
    }

    /// The timestamp at or below which `account`'s orders are rejected.
    #[must_use]
    pub fn effective_floor(&self, account: AccountId, current_seq: u64) -> u64 {
        match self.latest.get(&account) {
            Some(inv) if inv.effective_at_seq <= current_seq => inv.timestamp_ms,
            Some(inv) => inv.superseded_floor_ms,
            None => 0,
        }
    }

    /// # Errors
    /// Returns `NonceTimestampTooLow` if `order_timestamp_ms` is at or below
    /// the effective floor.
    pub fn assert_order_fresh(
        &self,
        account: AccountId,
        order_timestamp_ms: u64,
        current_seq: u64,
    ) -> Result<()> {
        let floor_ms = self.effective_floor(account, current_seq);
        if floor_ms > 0 && order_timestamp_ms <= floor_ms {
            return Err(LedgerError::NonceTimestampTooLow {
                timestamp_ms: order_timestamp_ms,
                floor_ms,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn latest(&self, account: &AccountId) -> Option<&NonceInvalidation> {
        self.latest.get(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: AccountId = AccountId([1u8; 32]);
    const NOW: u64 = 1_700_000_000_000;
    const DAY: u64 = 86_400_000;

    fn nonce(ms: u64) -> Nonce {
        Nonce::from_timestamp_ms(ms)
    }

    #[test]
    fn first_invalidation_is_delayed() {
        let mut tracker = InvalidationTracker::new();
        let inv = tracker
            .invalidate(ALICE, nonce(NOW), NOW, DAY, 10, 5)
            .unwrap();
        assert_eq!(inv.timestamp_ms, NOW);
        assert_eq!(inv.effective_at_seq, 15);

        assert_eq!(tracker.effective_floor(ALICE, 14), 0);
        assert!(tracker.assert_order_fresh(ALICE, NOW - 1, 14).is_ok());

        assert_eq!(tracker.effective_floor(ALICE, 15), NOW);
        assert_eq!(
            tracker.assert_order_fresh(ALICE, NOW, 15),
            Err(LedgerError::NonceTimestampTooLow {
                timestamp_ms: NOW,
                floor_ms: NOW
            })
        );
        assert!(tracker.assert_order_fresh(ALICE, NOW + 1, 15).is_ok());
    }

    #[test]
    fn rejects_non_v7_nonce() {
        let mut tracker = InvalidationTracker::new();
        let v1 = Nonce::from_bytes([0x11; 16]);
        assert_eq!(
            tracker.invalidate(ALICE, v1, NOW, DAY, 0, 0),
            Err(LedgerError::NotTimeOrderedNonce)
        );
    }

    #[test]
    fn rejects_far_future_timestamp() {
        let mut tracker = InvalidationTracker::new();
        assert!(tracker.invalidate(ALICE, nonce(NOW + DAY), NOW, DAY, 0, 0).is_ok());

        let mut tracker = InvalidationTracker::new();
        assert!(matches!(
            tracker.invalidate(ALICE, nonce(NOW + DAY + 1), NOW, DAY, 0, 0),
            Err(LedgerError::TimestampTooFarInFuture { .. })
        ));
    }

    #[test]
    fn non_increasing_timestamp_rejected() {
        let mut tracker = InvalidationTracker::new();
        tracker.invalidate(ALICE, nonce(NOW), NOW, DAY, 0, 0).unwrap();
        for ts in [NOW, NOW - 1] {
            assert!(matches!(
                tracker.invalidate(ALICE, nonce(ts), NOW, DAY, 100, 0),
                Err(LedgerError::TimestampAlreadyInvalidated { .. })
            ));
        }
    }

    #[test]
    fn pending_invalidation_blocks_next() {
        let mut tracker = InvalidationTracker::new();
        tracker.invalidate(ALICE, nonce(NOW), NOW, DAY, 0, 10).unwrap();
        assert_eq!(
            tracker.invalidate(ALICE, nonce(NOW + 1), NOW, DAY, 9, 10),
            Err(LedgerError::PreviousInvalidationPending {
                effective_at_seq: 10
            })
        );
        let second = tracker
            .invalidate(ALICE, nonce(NOW + 1), NOW, DAY, 10, 10)
            .unwrap();
        assert_eq!(second.superseded_floor_ms, NOW);
    }

    #[test]
    fn superseded_floor_holds_while_next_is_pending() {
        let mut tracker = InvalidationTracker::new();
        tracker.invalidate(ALICE, nonce(NOW), NOW, DAY, 0, 0).unwrap();
        tracker
            .invalidate(ALICE, nonce(NOW + 500), NOW, DAY, 1, 10)
            .unwrap();
        // The earlier floor never lapses.
        assert_eq!(tracker.effective_floor(ALICE, 5), NOW);
        assert!(tracker.assert_order_fresh(ALICE, NOW, 5).is_err());
        assert!(tracker.assert_order_fresh(ALICE, NOW + 1, 5).is_ok());
        assert_eq!(tracker.effective_floor(ALICE, 11), NOW + 500);
    }

    #[test]
    fn accounts_are_independent() {
        let mut tracker = InvalidationTracker::new();
        let bob = AccountId([2u8; 32]);
        tracker.invalidate(ALICE, nonce(NOW), NOW, DAY, 0, 0).unwrap();
        assert_eq!(tracker.effective_floor(bob, 0), 0);
        assert!(tracker.latest(&bob).is_none());
    }
}

//! Identifiers used throughout Settlex.
//!
//! Accounts are ed25519 public keys, assets are 20-byte token identifiers,
//! nonces are UUIDv7 values whose top 48 bits carry a millisecond timestamp.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, Result};

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A custodial account. This is the raw ed25519 public key (32 bytes) that
/// signs the account's orders and withdrawals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Token identifier. [`AssetId::BASE`] is reserved for the implicit base
/// asset, which is never stored in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssetId(pub [u8; 20]);

impl AssetId {
    /// The implicit base asset (all-zero identifier).
    pub const BASE: Self = Self([0u8; 20]);

    #[must_use]
    pub fn is_base(&self) -> bool {
        *self == Self::BASE
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Nonce
// ---------------------------------------------------------------------------

/// Time-ordered unique identifier attached to every order and withdrawal.
///
/// Only UUIDv7 values are accepted where a timestamp is needed; any other
/// version fails with [`LedgerError::NotTimeOrderedNonce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Nonce(pub Uuid);

impl Nonce {
    /// A fresh nonce stamped with the current wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// A fresh nonce stamped with the given millisecond timestamp.
    #[must_use]
    pub fn from_timestamp_ms(timestamp_ms: u64) -> Self {
        let entropy = Uuid::now_v7();
        let mut random = [0u8; 10];
        random.copy_from_slice(&entropy.as_bytes()[6..16]);
        Self(uuid::Builder::from_unix_timestamp_millis(timestamp_ms, &random).into_uuid())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    #[must_use]
    pub fn is_time_ordered(&self) -> bool {
        self.0.get_version_num() == 7
    }

    /// Extract the embedded timestamp (milliseconds since UNIX epoch).
    pub fn timestamp_ms(&self) -> Result<u64> {
        if !self.is_time_ordered() {
            return Err(LedgerError::NotTimeOrderedNonce);
        }
        let bytes = self.0.as_bytes();
        Ok(u64::from_be_bytes([
            0, 0, bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5],
        ]))
    }
}

impl Default for Nonce {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Content hashes
// ---------------------------------------------------------------------------

/// SHA-256 hash over an order's signed content. Keys fill progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderHash(pub [u8; 32]);

impl fmt::Display for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// SHA-256 hash over a withdrawal's signed content. Recorded once processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct WithdrawalHash(pub [u8; 32]);

impl fmt::Display for WithdrawalHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// MarketPair
// ---------------------------------------------------------------------------

/// A trading pair as stated by symbol in a signed order (e.g., TKN/ETH).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MarketPair {
    pub base: String,
    pub quote: String,
}

impl MarketPair {
    #[must_use]
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
}

impl fmt::Display for MarketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

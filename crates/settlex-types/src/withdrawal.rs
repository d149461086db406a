//! Signed withdrawal model.
//!
//! The asset is named either by symbol (resolved at the nonce's timestamp)
//! or directly by identifier. The fee is chosen by the dispatcher within
//! the configured bound and is not part of the signed content.

use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetId, Nonce, Pips, WithdrawalHash, hashing::CanonicalEncoder};

/// How a withdrawal names its asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithdrawalAsset {
    Symbol(String),
    Id(AssetId),
}

impl std::fmt::Display for WithdrawalAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbol(symbol) => write!(f, "{symbol}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// A withdrawal request signed by the account owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub nonce: Nonce,
    pub account: AccountId,
    pub asset: WithdrawalAsset,
    /// Gross amount debited from the account, in pips.
    pub quantity: Pips,
    /// Portion of `quantity` kept as a fee, in pips.
    pub fee: Pips,
}

impl Withdrawal {
    /// Canonical signing payload.
    ///
    /// Format: `"settlex:withdrawal:v1:" || nonce || account || (0 || symbol | 1 || id) || quantity`
    #[must_use]
    pub fn encoder(&self) -> CanonicalEncoder {
        let mut enc = CanonicalEncoder::new("settlex:withdrawal:v1:");
        enc.bytes(self.nonce.0.as_bytes())
            .bytes(self.account.as_bytes());
        match &self.asset {
            WithdrawalAsset::Symbol(symbol) => enc.u8(0).str(symbol),
            WithdrawalAsset::Id(id) => enc.u8(1).bytes(id.as_bytes()),
        };
        enc.pips(self.quantity);
        enc
    }

    #[must_use]
    pub fn hash(&self) -> WithdrawalHash {
        WithdrawalHash(self.encoder().digest())
    }

    /// Amount released to the account after the fee.
    #[must_use]
    pub fn net_quantity(&self) -> Pips {
        self.quantity.saturating_sub(self.fee)
    }
}

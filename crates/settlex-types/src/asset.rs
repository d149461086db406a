//! Tradable asset model.
//!
//! An asset is *registered* (proposed) and later *confirmed* (usable). A
//! symbol may point at several confirmed assets over time (token
//! migrations); an identifier maps to at most one asset, ever.

use serde::{Deserialize, Serialize};

use crate::{AssetId, constants};

/// A registered or confirmed asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
    /// Native decimal precision, `0..=32`.
    pub decimals: u8,
    pub confirmed: bool,
    /// Wall-clock confirmation time. Zero while unconfirmed.
    pub confirmed_at_ms: u64,
}

impl Asset {
    /// A freshly registered, unconfirmed asset.
    #[must_use]
    pub fn registered(id: AssetId, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            decimals,
            confirmed: false,
            confirmed_at_ms: 0,
        }
    }

    /// The implicit base asset. Always confirmed, never stored.
    #[must_use]
    pub fn base() -> Self {
        Self {
            id: AssetId::BASE,
            symbol: constants::BASE_ASSET_SYMBOL.to_string(),
            decimals: constants::BASE_ASSET_DECIMALS,
            confirmed: true,
            confirmed_at_ms: 0,
        }
    }

    #[must_use]
    pub fn is_base(&self) -> bool {
        self.id.is_base()
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {} decimals)", self.symbol, self.id, self.decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_asset_is_confirmed() {
        let base = Asset::base();
        assert!(base.confirmed);
        assert!(base.is_base());
        assert_eq!(base.decimals, 18);
        assert_eq!(base.symbol, "ETH");
    }

    #[test]
    fn registered_asset_is_unconfirmed() {
        let asset = Asset::registered(AssetId([3u8; 20]), "TKN", 6);
        assert!(!asset.confirmed);
        assert_eq!(asset.confirmed_at_ms, 0);
        assert!(format!("{asset}").starts_with("TKN("));
    }
}

//! Two-phase asset registry with time-gated symbol resolution.
//!
//! ```text
//!   register(id, sym, dec)        confirm(id, sym, dec, now)
//!  ──────────────────────▶ REGISTERED ─────────────────────────▶ CONFIRMED
//!        (overwritable)                    (permanent)
//! ```
//!
//! Confirmed assets are appended to their symbol's history. Resolving a
//! symbol at time `t` returns the latest entry confirmed at or before `t`,
//! so an order signed before a token migration keeps resolving to the old
//! identifier.

use std::collections::HashMap;

use settlex_types::{Asset, AssetId, LedgerError, Result, constants};

/// Registry of tradable assets. The implicit base asset is never stored.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    /// Every registered or confirmed asset, by identifier.
    assets: HashMap<AssetId, Asset>,
    /// Confirmed identifiers per symbol, in confirmation order.
    history: HashMap<String, Vec<AssetId>>,
}

impl AssetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Propose an asset. Overwrites any prior unconfirmed registration for
    /// the same identifier.
    ///
    /// # Errors
    /// - `AlreadyFinalized` if the identifier is confirmed
    /// - `InvalidIdentifier` for the base asset's identifier
    /// - `InvalidSymbol` for an empty or reserved symbol
    /// - `DecimalsOutOfRange` if `decimals > 32`
    pub fn register(&mut self, id: AssetId, symbol: &str, decimals: u8) -> Result<Asset> {
        if id.is_base() {
            return Err(LedgerError::InvalidIdentifier(id));
        }
        if self.assets.get(&id).is_some_and(|a| a.confirmed) {
            return Err(LedgerError::AlreadyFinalized(id));
        }
        if symbol.is_empty() || symbol == constants::BASE_ASSET_SYMBOL {
            return Err(LedgerError::InvalidSymbol {
                symbol: symbol.to_string(),
            });
        }
        if decimals > constants::MAX_ASSET_DECIMALS {
            return Err(LedgerError::DecimalsOutOfRange { decimals });
        }

        let asset = Asset::registered(id, symbol, decimals);
        self.assets.insert(id, asset.clone());
        tracing::debug!(asset = %id, symbol, decimals, "Asset registered");
        Ok(asset)
    }

    /// Confirm a registration. The arguments must repeat the registration
    /// exactly; `now_ms` becomes the confirmation time.
    ///
    /// # Errors
    /// - `UnknownAsset` if nothing is registered under `id`
    /// - `AlreadyFinalized` if already confirmed
    /// - `SymbolMismatch` / `DecimalsMismatch` if the arguments disagree
    pub fn confirm(&mut self, id: AssetId, symbol: &str, decimals: u8, now_ms: u64) -> Result<Asset> {
        let asset = self
            .assets
            .get_mut(&id)
            .ok_or(LedgerError::UnknownAsset(id))?;

        if asset.confirmed {
            return Err(LedgerError::AlreadyFinalized(id));
        }
        if asset.symbol != symbol {
            return Err(LedgerError::SymbolMismatch {
                registered: asset.symbol.clone(),
                confirmed: symbol.to_string(),
            });
        }
        if asset.decimals != decimals {
            return Err(LedgerError::DecimalsMismatch {
                registered: asset.decimals,
                confirmed: decimals,
            });
        }

        asset.confirmed = true;
        asset.confirmed_at_ms = now_ms;
        let confirmed = asset.clone();
        self.history
            .entry(confirmed.symbol.clone())
            .or_default()
            .push(id);
        tracing::debug!(asset = %id, symbol, confirmed_at_ms = now_ms, "Asset confirmed");
        Ok(confirmed)
    }

    /// Resolve a symbol as of `at_ms`.
    ///
    /// # Errors
    /// Returns `NoConfirmedAssetForSymbol` if no confirmed asset carried the
    /// symbol at that time.
    pub fn resolve_by_symbol(&self, symbol: &str, at_ms: u64) -> Result<Asset> {
        if symbol == constants::BASE_ASSET_SYMBOL {
            return Ok(Asset::base());
        }

        let mut best: Option<&Asset> = None;
        for id in self.history.get(symbol).into_iter().flatten() {
            let Some(candidate) = self.assets.get(id) else {
                continue;
            };
            if candidate.confirmed_at_ms > at_ms {
                continue;
            }
            // `>=` so later confirmations win ties.
            if best.is_none_or(|b| candidate.confirmed_at_ms >= b.confirmed_at_ms) {
                best = Some(candidate);
            }
        }

        best.cloned()
            .ok_or_else(|| LedgerError::NoConfirmedAssetForSymbol {
                symbol: symbol.to_string(),
                at_ms,
            })
    }

    /// Resolve an identifier to its confirmed asset.
    ///
    /// # Errors
    /// Returns `NoConfirmedAssetForIdentifier` if unknown or unconfirmed.
    pub fn resolve_by_id(&self, id: AssetId) -> Result<Asset> {
        if id.is_base() {
            return Ok(Asset::base());
        }
        self.assets
            .get(&id)
            .filter(|a| a.confirmed)
            .cloned()
            .ok_or(LedgerError::NoConfirmedAssetForIdentifier(id))
    }

    /// Look up a registration regardless of confirmation state.
    #[must_use]
    pub fn get(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.get(id)
    }

    /// Number of stored assets (registered or confirmed).
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TKN_A: AssetId = AssetId([0xaa; 20]);
    const TKN_B: AssetId = AssetId([0xbb; 20]);

    fn confirmed(registry: &mut AssetRegistry, id: AssetId, symbol: &str, at_ms: u64) {
        registry.register(id, symbol, 18).unwrap();
        registry.confirm(id, symbol, 18, at_ms).unwrap();
    }

    #[test]
    fn register_then_confirm() {
        let mut reg = AssetRegistry::new();
        let asset = reg.register(TKN_A, "TKN", 6).unwrap();
        assert!(!asset.confirmed);
        assert!(reg.resolve_by_id(TKN_A).is_err());

        let asset = reg.confirm(TKN_A, "TKN", 6, 1_000).unwrap();
        assert!(asset.confirmed);
        assert_eq!(asset.confirmed_at_ms, 1_000);
        assert_eq!(reg.resolve_by_id(TKN_A).unwrap(), asset);
    }

    #[test]
    fn register_overwrites_unconfirmed() {
        let mut reg = AssetRegistry::new();
        reg.register(TKN_A, "TKN", 6).unwrap();
        reg.register(TKN_A, "TKX", 8).unwrap();
        let err = reg.confirm(TKN_A, "TKN", 6, 1).unwrap_err();
        assert!(matches!(err, LedgerError::SymbolMismatch { .. }));
        assert!(reg.confirm(TKN_A, "TKX", 8, 1).is_ok());
    }

    #[test]
    fn confirmed_registration_is_permanent() {
        let mut reg = AssetRegistry::new();
        confirmed(&mut reg, TKN_A, "TKN", 1);
        assert_eq!(
            reg.register(TKN_A, "TKN", 18),
            Err(LedgerError::AlreadyFinalized(TKN_A))
        );
        assert_eq!(
            reg.confirm(TKN_A, "TKN", 18, 2),
            Err(LedgerError::AlreadyFinalized(TKN_A))
        );
    }

    #[test]
    fn register_validation() {
        let mut reg = AssetRegistry::new();
        assert_eq!(
            reg.register(AssetId::BASE, "TKN", 18),
            Err(LedgerError::InvalidIdentifier(AssetId::BASE))
        );
        assert!(matches!(
            reg.register(TKN_A, "", 18),
            Err(LedgerError::InvalidSymbol { .. })
        ));
        assert!(matches!(
            reg.register(TKN_A, "ETH", 18),
            Err(LedgerError::InvalidSymbol { .. })
        ));
        assert_eq!(
            reg.register(TKN_A, "TKN", 33),
            Err(LedgerError::DecimalsOutOfRange { decimals: 33 })
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn confirm_validation() {
        let mut reg = AssetRegistry::new();
        assert_eq!(
            reg.confirm(TKN_A, "TKN", 18, 1),
            Err(LedgerError::UnknownAsset(TKN_A))
        );
        reg.register(TKN_A, "TKN", 18).unwrap();
        assert_eq!(
            reg.confirm(TKN_A, "TKN", 6, 1),
            Err(LedgerError::DecimalsMismatch {
                registered: 18,
                confirmed: 6
            })
        );
        // Failed confirmations leave the registration untouched.
        assert!(!reg.get(&TKN_A).unwrap().confirmed);
    }

    #[test]
    fn base_symbol_and_identifier_resolve_implicitly() {
        let reg = AssetRegistry::new();
        assert_eq!(reg.resolve_by_symbol("ETH", 0).unwrap(), Asset::base());
        assert_eq!(reg.resolve_by_id(AssetId::BASE).unwrap(), Asset::base());
    }

    #[test]
    fn symbol_resolution_is_time_gated() {
        let mut reg = AssetRegistry::new();
        confirmed(&mut reg, TKN_A, "TKN", 1_000);
        confirmed(&mut reg, TKN_B, "TKN", 2_000);

        assert!(matches!(
            reg.resolve_by_symbol("TKN", 999),
            Err(LedgerError::NoConfirmedAssetForSymbol { .. })
        ));
        for t in [1_000, 1_500, 1_999] {
            assert_eq!(reg.resolve_by_symbol("TKN", t).unwrap().id, TKN_A, "t={t}");
        }
        for t in [2_000, 5_000, u64::MAX] {
            assert_eq!(reg.resolve_by_symbol("TKN", t).unwrap().id, TKN_B, "t={t}");
        }
    }

    #[test]
    fn ties_resolve_to_later_confirmation() {
        let mut reg = AssetRegistry::new();
        confirmed(&mut reg, TKN_A, "TKN", 1_000);
        confirmed(&mut reg, TKN_B, "TKN", 1_000);
        assert_eq!(reg.resolve_by_symbol("TKN", 1_000).unwrap().id, TKN_B);
    }

    #[test]
    fn unconfirmed_assets_never_resolve_by_symbol() {
        let mut reg = AssetRegistry::new();
        reg.register(TKN_A, "TKN", 18).unwrap();
        assert!(reg.resolve_by_symbol("TKN", u64::MAX).is_err());
        assert_eq!(
            reg.resolve_by_id(TKN_A),
            Err(LedgerError::NoConfirmedAssetForIdentifier(TKN_A))
        );
    }
}

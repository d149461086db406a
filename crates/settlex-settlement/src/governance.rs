//! Admin-gated configuration and asset registry management.
//!
//! Changing the propagation delay only affects intents recorded afterwards;
//! pending invalidations and exits keep the step they were given.

use settlex_types::{AccountId, Asset, AssetId, LedgerError, LedgerEvent, Result, constants};

use crate::clock::Clock;
use crate::custody::Custody;
use crate::engine::SettlementEngine;

impl<C: Custody, K: Clock> SettlementEngine<C, K> {
    /// Propose an asset for trading.
    ///
    /// # Errors
    /// `CallerNotAdmin`, or any registry registration error.
    pub fn register_asset(
        &mut self,
        caller: AccountId,
        id: AssetId,
        symbol: &str,
        decimals: u8,
    ) -> Result<Asset> {
        self.ensure_admin(caller)?;
        let asset = self.registry.register(id, symbol, decimals)?;
        tracing::info!(asset = %id, symbol, decimals, "Asset registered");
        self.emit(LedgerEvent::AssetRegistered {
            asset: id,
            symbol: asset.symbol.clone(),
            decimals,
        });
        Ok(asset)
    }

    /// Confirm a registration, stamping the current wall-clock time.
    ///
    /// # Errors
    /// `CallerNotAdmin`, or any registry confirmation error.
    pub fn confirm_asset(
        &mut self,
        caller: AccountId,
        id: AssetId,
        symbol: &str,
        decimals: u8,
    ) -> Result<Asset> {
        self.ensure_admin(caller)?;
        let now_ms = self.clock.now_ms();
        let asset = self.registry.confirm(id, symbol, decimals, now_ms)?;
        tracing::info!(asset = %id, symbol, confirmed_at_ms = now_ms, "Asset confirmed");
        self.emit(LedgerEvent::AssetConfirmed {
            asset: id,
            symbol: asset.symbol.clone(),
            decimals,
            confirmed_at_ms: now_ms,
        });
        Ok(asset)
    }

    /// # Errors
    /// `CallerNotAdmin`.
    pub fn set_dispatcher(&mut self, caller: AccountId, dispatcher: AccountId) -> Result<()> {
        self.ensure_admin(caller)?;
        let previous = std::mem::replace(&mut self.config.dispatcher, dispatcher);
        tracing::info!(previous = %previous.short(), current = %dispatcher.short(), "Dispatcher changed");
        self.emit(LedgerEvent::DispatcherChanged {
            previous,
            current: dispatcher,
        });
        Ok(())
    }

    /// # Errors
    /// `CallerNotAdmin`.
    pub fn set_fee_wallet(&mut self, caller: AccountId, fee_wallet: AccountId) -> Result<()> {
        self.ensure_admin(caller)?;
        let previous = std::mem::replace(&mut self.config.fee_wallet, fee_wallet);
        tracing::info!(previous = %previous.short(), current = %fee_wallet.short(), "Fee wallet changed");
        self.emit(LedgerEvent::FeeWalletChanged {
            previous,
            current: fee_wallet,
        });
        Ok(())
    }

    /// Replace all three fee ceilings.
    ///
    /// # Errors
    /// `CallerNotAdmin`, or `FeeBpsAboveCeiling` if any exceeds the fixed ceiling.
    pub fn set_fee_limits(
        &mut self,
        caller: AccountId,
        max_maker_fee_bps: u64,
        max_taker_fee_bps: u64,
        max_withdrawal_fee_bps: u64,
    ) -> Result<()> {
        self.ensure_admin(caller)?;
        for bps in [max_maker_fee_bps, max_taker_fee_bps, max_withdrawal_fee_bps] {
            if bps > constants::FEE_BPS_CEILING {
                return Err(LedgerError::FeeBpsAboveCeiling {
                    bps,
                    ceiling: constants::FEE_BPS_CEILING,
                });
            }
        }
        self.config.max_maker_fee_bps = max_maker_fee_bps;
        self.config.max_taker_fee_bps = max_taker_fee_bps;
        self.config.max_withdrawal_fee_bps = max_withdrawal_fee_bps;
        tracing::info!(
            max_maker_fee_bps,
            max_taker_fee_bps,
            max_withdrawal_fee_bps,
            "Fee limits changed"
        );
        self.emit(LedgerEvent::FeeLimitsChanged {
            max_maker_fee_bps,
            max_taker_fee_bps,
            max_withdrawal_fee_bps,
        });
        Ok(())
    }

    /// # Errors
    /// `CallerNotAdmin`, or `PropagationDelayOutOfRange` outside the
    /// configured bounds.
    pub fn set_propagation_delay(&mut self, caller: AccountId, delay: u64) -> Result<()> {
        self.ensure_admin(caller)?;
        let (min, max) = (
            self.config.min_propagation_delay,
            self.config.max_propagation_delay,
        );
        if !(min..=max).contains(&delay) {
            return Err(LedgerError::PropagationDelayOutOfRange { delay, min, max });
        }
        let previous = std::mem::replace(&mut self.config.propagation_delay, delay);
        tracing::info!(previous, current = delay, "Propagation delay changed");
        self.emit(LedgerEvent::PropagationDelayChanged {
            previous,
            current: delay,
        });
        Ok(())
    }
}

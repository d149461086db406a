//! Account-initiated operations: nonce invalidation and the wallet exit
//! escape hatch.
//!
//! None of these go through the dispatcher. Once an exit takes effect the
//! account can pull every balance out of custody on its own, so an operator
//! that stops processing withdrawals cannot trap funds.

use settlex_ledger::NonceInvalidation;
use settlex_types::{AccountId, AssetId, LedgerError, LedgerEvent, Nonce, Pips, Result, pips_to_units};

use crate::clock::Clock;
use crate::custody::Custody;
use crate::engine::SettlementEngine;

impl<C: Custody, K: Clock> SettlementEngine<C, K> {
    /// Reject every order `account` signed at or before `nonce`'s timestamp,
    /// once the propagation delay has elapsed.
    ///
    /// # Errors
    /// `NotTimeOrderedNonce`, `TimestampTooFarInFuture`,
    /// `TimestampAlreadyInvalidated` or `PreviousInvalidationPending`.
    pub fn invalidate_order_nonce(
        &mut self,
        account: AccountId,
        nonce: Nonce,
    ) -> Result<NonceInvalidation> {
        let now_ms = self.clock.now_ms();
        let invalidation = self.invalidations.invalidate(
            account,
            nonce,
            now_ms,
            self.config.nonce_future_tolerance_ms,
            self.current_seq,
            self.config.propagation_delay,
        )?;
        tracing::info!(
            account = %account.short(),
            timestamp_ms = invalidation.timestamp_ms,
            effective_at_seq = invalidation.effective_at_seq,
            "Order nonce invalidated"
        );
        self.emit(LedgerEvent::OrderNonceInvalidated {
            account,
            nonce,
            timestamp_ms: invalidation.timestamp_ms,
            effective_at_seq: invalidation.effective_at_seq,
        });
        Ok(invalidation)
    }

    /// Start the exit. Returns the step at which it takes effect.
    ///
    /// # Errors
    /// `AlreadyExited` if an exit is already recorded.
    pub fn request_exit(&mut self, account: AccountId) -> Result<u64> {
        let effective_at_seq =
            self.exits
                .request_exit(account, self.current_seq, self.config.propagation_delay)?;
        tracing::info!(account = %account.short(), effective_at_seq, "Wallet exit requested");
        self.emit(LedgerEvent::WalletExited {
            account,
            effective_at_seq,
        });
        Ok(effective_at_seq)
    }

    /// Release an exited account's whole balance in `asset` to its wallet.
    ///
    /// # Errors
    /// - `ExitNotFinalized` unless the exit has taken effect
    /// - `NoBalance` if nothing is held
    /// - `CustodyRejected` if custody refuses the release
    pub fn withdraw_exited(&mut self, account: AccountId, asset: AssetId) -> Result<Pips> {
        self.exits.assert_finalized(account, self.current_seq)?;
        let quantity = self.balances.balance_of(account, asset);
        if quantity == 0 {
            return Err(LedgerError::NoBalance { account, asset });
        }
        // A non-zero balance implies the asset was confirmed when deposited.
        let decimals = self.registry.resolve_by_id(asset)?.decimals;
        let native = pips_to_units(quantity, decimals)?;
        self.custody.release_out(account, asset, native)?;

        self.balances.take_all(account, asset);
        self.supply.record_release(asset, quantity);
        tracing::info!(account = %account.short(), %asset, quantity, native, "Exited wallet withdrawn");
        self.emit(LedgerEvent::WalletExitWithdrawn {
            account,
            asset,
            quantity,
        });
        Ok(quantity)
    }

    /// Return the account to normal operation. Fill progress and nonce
    /// invalidations recorded before the exit still apply.
    ///
    /// # Errors
    /// `NotExited` if no exit is recorded.
    pub fn clear_exit(&mut self, account: AccountId) -> Result<()> {
        self.exits.clear_exit(account)?;
        tracing::info!(account = %account.short(), "Wallet exit cleared");
        self.emit(LedgerEvent::WalletExitCleared { account });
        Ok(())
    }
}

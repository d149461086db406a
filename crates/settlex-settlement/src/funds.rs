//! Deposits and dispatcher-submitted withdrawals.
//!
//! Deposits convert native units to pips with floor truncation; the
//! sub-pip remainder stays in custody as dust and is never credited or
//! swept. Withdrawals run every check, including the balance debit, before
//! asking custody to release anything, so a custody refusal leaves the
//! ledger untouched.

use settlex_ledger::Posting;
use settlex_types::{
    AccountId, Asset, AssetId, LedgerError, LedgerEvent, NativeAmount, Pips, Result, Signature,
    Withdrawal, WithdrawalAsset, WithdrawalHash, constants, pips_to_units, signing, units_to_pips,
};

use crate::clock::Clock;
use crate::custody::Custody;
use crate::engine::SettlementEngine;

impl<C: Custody, K: Clock> SettlementEngine<C, K> {
    /// Pull `native_quantity` of `asset` (the base asset when `None`) from
    /// the account's wallet into custody and credit the ledger.
    ///
    /// Returns the pips credited.
    ///
    /// # Errors
    /// - `AccountExited` if the account's exit has taken effect
    /// - `NoConfirmedAssetForIdentifier` for unknown or unconfirmed assets
    /// - `QuantityTooLow` if the amount is below one pip
    /// - `UnexpectedTransferAmount` if custody received a different amount;
    ///   the received amount has been refunded
    /// - `DepositRefundFailed` if that refund was refused
    pub fn deposit(
        &mut self,
        account: AccountId,
        asset: Option<AssetId>,
        native_quantity: NativeAmount,
    ) -> Result<Pips> {
        self.exits.ensure_active(account, self.current_seq)?;
        let asset = self
            .registry
            .resolve_by_id(asset.unwrap_or(AssetId::BASE))?;
        let quantity = units_to_pips(native_quantity, asset.decimals)?;
        if quantity == 0 {
            return Err(LedgerError::QuantityTooLow);
        }
        let balance_after = self
            .balances
            .balance_of(account, asset.id)
            .checked_add(quantity)
            .ok_or(LedgerError::Overflow)?;

        let before = self.custody.holdings(asset.id);
        self.custody.pull_in(account, asset.id, native_quantity)?;
        let received = self.custody.holdings(asset.id).saturating_sub(before);
        if received != native_quantity {
            if let Err(err) = self.custody.refund(account, asset.id, received) {
                tracing::error!(
                    account = %account.short(),
                    asset = %asset.id,
                    received,
                    error = %err,
                    "Failed to return short deposit"
                );
                return Err(LedgerError::DepositRefundFailed {
                    account,
                    asset: asset.id,
                    received,
                    reason: err.to_string(),
                });
            }
            tracing::warn!(
                account = %account.short(),
                asset = %asset.id,
                expected = native_quantity,
                received,
                "Deposit rejected: unexpected transfer amount"
            );
            return Err(LedgerError::UnexpectedTransferAmount {
                expected: native_quantity,
                received,
            });
        }

        self.balances.credit(account, asset.id, quantity)?;
        self.supply.record_deposit(asset.id, quantity);
        let index = self.deposit_index;
        self.deposit_index += 1;

        tracing::info!(
            index,
            account = %account.short(),
            asset = %asset,
            native_quantity,
            quantity,
            "Deposit credited"
        );
        self.emit(LedgerEvent::Deposited {
            index,
            account,
            asset: asset.id,
            native_quantity,
            quantity,
            balance_after,
        });
        Ok(quantity)
    }

    /// Process a signed withdrawal: debit the full quantity, credit the fee
    /// to the fee wallet and release the rest from custody.
    ///
    /// # Errors
    /// `CallerNotDispatcher`, `AccountExited`, `ZeroQuantity`,
    /// `ExcessiveWithdrawalFee`, asset resolution errors, `InvalidSignature`,
    /// `AlreadyWithdrawn`, `InsufficientBalance` or `CustodyRejected`.
    pub fn withdraw(
        &mut self,
        caller: AccountId,
        withdrawal: &Withdrawal,
        signature: &Signature,
    ) -> Result<WithdrawalHash> {
        let result = self.try_withdraw(caller, withdrawal, signature);
        if let Err(err) = &result {
            tracing::warn!(
                code = %err.code(),
                account = %withdrawal.account.short(),
                asset = %withdrawal.asset,
                error = %err,
                "Withdrawal rejected"
            );
        }
        result
    }

    fn try_withdraw(
        &mut self,
        caller: AccountId,
        withdrawal: &Withdrawal,
        signature: &Signature,
    ) -> Result<WithdrawalHash> {
        self.ensure_dispatcher(caller)?;
        let account = withdrawal.account;
        self.exits.ensure_active(account, self.current_seq)?;

        if withdrawal.quantity == 0 {
            return Err(LedgerError::ZeroQuantity);
        }
        let fee_bound = u128::from(withdrawal.quantity)
            * u128::from(self.config.max_withdrawal_fee_bps);
        if u128::from(withdrawal.fee) * u128::from(constants::BASIS_POINTS) > fee_bound {
            return Err(LedgerError::ExcessiveWithdrawalFee);
        }

        let asset = self.resolve_withdrawal_asset(withdrawal)?;
        let hash = withdrawal.hash();
        signing::verify_digest(&account, &hash.0, signature)?;
        self.withdrawals.ensure_unprocessed(&hash)?;

        let postings = [
            Posting::Debit {
                account,
                asset: asset.id,
                amount: withdrawal.quantity,
            },
            Posting::Credit {
                account: self.config.fee_wallet,
                asset: asset.id,
                amount: withdrawal.fee,
            },
        ];
        let touched = self.balances.preview(&postings)?;
        let balance_after = touched
            .iter()
            .find(|((a, _), _)| *a == account)
            .map_or(0, |(_, balance)| *balance);

        let net = withdrawal.net_quantity();
        let native = pips_to_units(net, asset.decimals)?;
        self.custody.release_out(account, asset.id, native)?;

        self.balances.apply(&postings)?;
        self.withdrawals.mark_processed(hash)?;
        self.supply.record_release(asset.id, net);

        tracing::info!(
            %hash,
            account = %account.short(),
            asset = %asset,
            quantity = withdrawal.quantity,
            fee = withdrawal.fee,
            native,
            "Withdrawal processed"
        );
        self.emit(LedgerEvent::Withdrawn {
            hash,
            account,
            asset: asset.id,
            quantity: withdrawal.quantity,
            fee: withdrawal.fee,
            balance_after,
        });
        Ok(hash)
    }

    fn resolve_withdrawal_asset(&self, withdrawal: &Withdrawal) -> Result<Asset> {
        match &withdrawal.asset {
            WithdrawalAsset::Symbol(symbol) => {
                let at_ms = withdrawal.nonce.timestamp_ms()?;
                self.registry.resolve_by_symbol(symbol, at_ms)
            }
            WithdrawalAsset::Id(id) => self.registry.resolve_by_id(*id),
        }
    }
}

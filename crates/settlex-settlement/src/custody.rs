//! Custody boundary.
//!
//! The engine never holds assets itself, only accounting for them. Value
//! crosses the boundary through [`Custody::pull_in`] on deposit and
//! [`Custody::release_out`] on withdrawal. A deposit that arrives short is
//! handed back with [`Custody::refund`]. Quantities are native units.

use std::collections::HashMap;

use settlex_types::{AccountId, AssetId, LedgerError, NativeAmount, Result, constants};

pub trait Custody: Send + Sync {
    /// Native units of `asset` currently held in custody.
    fn holdings(&self, asset: AssetId) -> NativeAmount;

    /// Move `quantity` from the account's external wallet into custody.
    ///
    /// # Errors
    /// `CustodyRejected` if the transfer cannot happen.
    fn pull_in(&mut self, account: AccountId, asset: AssetId, quantity: NativeAmount)
    -> Result<()>;

    /// Move `quantity` out of custody to the account's external wallet.
    ///
    /// # Errors
    /// `CustodyRejected` if the transfer cannot happen.
    fn release_out(
        &mut self,
        account: AccountId,
        asset: AssetId,
        quantity: NativeAmount,
    ) -> Result<()>;

    /// Hand back exactly `quantity` that custody just received from the
    /// account. Unlike [`Custody::release_out`], no transfer charge applies.
    ///
    /// # Errors
    /// `CustodyRejected` if the amount cannot be returned.
    fn refund(&mut self, account: AccountId, asset: AssetId, quantity: NativeAmount)
    -> Result<()>;
}

/// In-process custody with simulated external wallets.
///
/// Assets can be flagged with a transfer fee to model tokens that deliver
/// less than the requested amount.
#[derive(Debug, Default)]
pub struct InMemoryCustody {
    holdings: HashMap<AssetId, NativeAmount>,
    wallets: HashMap<(AccountId, AssetId), NativeAmount>,
    transfer_fee_bps: HashMap<AssetId, u64>,
}

impl InMemoryCustody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account's external wallet (outside the engine).
    pub fn fund_wallet(&mut self, account: AccountId, asset: AssetId, quantity: NativeAmount) {
        let entry = self.wallets.entry((account, asset)).or_default();
        *entry = entry.saturating_add(quantity);
    }

    #[must_use]
    pub fn wallet_balance(&self, account: AccountId, asset: AssetId) -> NativeAmount {
        self.wallets.get(&(account, asset)).copied().unwrap_or(0)
    }

    /// Make every transfer of `asset` deliver `bps` less than requested.
    pub fn set_transfer_fee_bps(&mut self, asset: AssetId, bps: u64) {
        if bps == 0 {
            self.transfer_fee_bps.remove(&asset);
        } else {
            self.transfer_fee_bps.insert(asset, bps);
        }
    }

    fn delivered(&self, asset: AssetId, quantity: NativeAmount) -> NativeAmount {
        let bps = self.transfer_fee_bps.get(&asset).copied().unwrap_or(0);
        let fee = quantity.saturating_mul(u128::from(bps)) / u128::from(constants::BASIS_POINTS);
        quantity - fee.min(quantity)
    }
}

impl Custody for InMemoryCustody {
    fn holdings(&self, asset: AssetId) -> NativeAmount {
        self.holdings.get(&asset).copied().unwrap_or(0)
    }

    fn pull_in(
        &mut self,
        account: AccountId,
        asset: AssetId,
        quantity: NativeAmount,
    ) -> Result<()> {
        let wallet = self.wallet_balance(account, asset);
        if wallet < quantity {
            return Err(LedgerError::CustodyRejected {
                reason: format!("wallet {account} holds {wallet} of {asset}, needs {quantity}"),
            });
        }
        let delivered = self.delivered(asset, quantity);
        let held = self.holdings(asset);
        let updated = held
            .checked_add(delivered)
            .ok_or_else(|| LedgerError::CustodyRejected {
                reason: format!("holdings of {asset} overflow"),
            })?;

        self.wallets.insert((account, asset), wallet - quantity);
        self.holdings.insert(asset, updated);
        Ok(())
    }

    fn release_out(
        &mut self,
        account: AccountId,
        asset: AssetId,
        quantity: NativeAmount,
    ) -> Result<()> {
        let held = self.holdings(asset);
        if held < quantity {
            return Err(LedgerError::CustodyRejected {
                reason: format!("custody holds {held} of {asset}, cannot release {quantity}"),
            });
        }
        let delivered = self.delivered(asset, quantity);
        self.holdings.insert(asset, held - quantity);
        self.fund_wallet(account, asset, delivered);
        Ok(())
    }

    fn refund(
        &mut self,
        account: AccountId,
        asset: AssetId,
        quantity: NativeAmount,
    ) -> Result<()> {
        let held = self.holdings(asset);
        if held < quantity {
            return Err(LedgerError::CustodyRejected {
                reason: format!("custody holds {held} of {asset}, cannot refund {quantity}"),
            });
        }
        self.holdings.insert(asset, held - quantity);
        self.fund_wallet(account, asset, quantity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: AccountId = AccountId([1u8; 32]);
    const TKN: AssetId = AssetId([0xaa; 20]);

    #[test]
    fn pull_in_moves_wallet_to_holdings() {
        let mut custody = InMemoryCustody::new();
        custody.fund_wallet(ALICE, TKN, 1_000);
        custody.pull_in(ALICE, TKN, 600).unwrap();
        assert_eq!(custody.holdings(TKN), 600);
        assert_eq!(custody.wallet_balance(ALICE, TKN), 400);
    }

    #[test]
    fn pull_in_beyond_wallet_rejected() {
        let mut custody = InMemoryCustody::new();
        custody.fund_wallet(ALICE, TKN, 10);
        assert!(matches!(
            custody.pull_in(ALICE, TKN, 11),
            Err(LedgerError::CustodyRejected { .. })
        ));
        assert_eq!(custody.holdings(TKN), 0);
        assert_eq!(custody.wallet_balance(ALICE, TKN), 10);
    }

    #[test]
    fn transfer_fee_reduces_delivery() {
        let mut custody = InMemoryCustody::new();
        custody.set_transfer_fee_bps(TKN, 100);
        custody.fund_wallet(ALICE, TKN, 10_000);
        custody.pull_in(ALICE, TKN, 10_000).unwrap();
        assert_eq!(custody.holdings(TKN), 9_900);
    }

    #[test]
    fn refund_skips_the_transfer_fee() {
        let mut custody = InMemoryCustody::new();
        custody.set_transfer_fee_bps(TKN, 100);
        custody.fund_wallet(ALICE, TKN, 10_000);
        custody.pull_in(ALICE, TKN, 10_000).unwrap();
        custody.refund(ALICE, TKN, 9_900).unwrap();
        assert_eq!(custody.holdings(TKN), 0);
        assert_eq!(custody.wallet_balance(ALICE, TKN), 9_900);
        assert!(custody.refund(ALICE, TKN, 1).is_err());
    }

    #[test]
    fn release_out_beyond_holdings_rejected() {
        let mut custody = InMemoryCustody::new();
        custody.fund_wallet(ALICE, TKN, 5);
        custody.pull_in(ALICE, TKN, 5).unwrap();
        assert!(custody.release_out(ALICE, TKN, 6).is_err());
        custody.release_out(ALICE, TKN, 5).unwrap();
        assert_eq!(custody.holdings(TKN), 0);
        assert_eq!(custody.wallet_balance(ALICE, TKN), 5);
    }
}

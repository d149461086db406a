//! Shared async access to one engine.
//!
//! The engine has no internal concurrency. [`EngineHandle`] serializes
//! every mutating call behind the write half of a `tokio::sync::RwLock`,
//! which makes the lock the total order the engine relies on. Reads share
//! the read half.

use std::sync::Arc;

use settlex_ledger::{ExitStatus, FillProgress, NonceInvalidation};
use settlex_types::{
    AccountId, Asset, AssetId, EventRecord, Fill, NativeAmount, Nonce, Order, OrderHash, Pips,
    Result, SettlementRecord, Signature, Withdrawal, WithdrawalHash,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::clock::{Clock, SystemClock};
use crate::custody::{Custody, InMemoryCustody};
use crate::engine::SettlementEngine;

pub struct EngineHandle<C = InMemoryCustody, K = SystemClock> {
    inner: Arc<RwLock<SettlementEngine<C, K>>>,
}

impl<C, K> Clone for EngineHandle<C, K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Custody, K: Clock> EngineHandle<C, K> {
    #[must_use]
    pub fn new(engine: SettlementEngine<C, K>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    pub async fn settle(
        &self,
        caller: AccountId,
        buy: &Order,
        buy_signature: &Signature,
        sell: &Order,
        sell_signature: &Signature,
        fill: &Fill,
    ) -> Result<SettlementRecord> {
        self.inner
            .write()
            .await
            .settle(caller, buy, buy_signature, sell, sell_signature, fill)
    }

    pub async fn deposit(
        &self,
        account: AccountId,
        asset: Option<AssetId>,
        native_quantity: NativeAmount,
    ) -> Result<Pips> {
        self.inner
            .write()
            .await
            .deposit(account, asset, native_quantity)
    }

    pub async fn withdraw(
        &self,
        caller: AccountId,
        withdrawal: &Withdrawal,
        signature: &Signature,
    ) -> Result<WithdrawalHash> {
        self.inner
            .write()
            .await
            .withdraw(caller, withdrawal, signature)
    }

    pub async fn invalidate_order_nonce(
        &self,
        account: AccountId,
        nonce: Nonce,
    ) -> Result<NonceInvalidation> {
        self.inner
            .write()
            .await
            .invalidate_order_nonce(account, nonce)
    }

    pub async fn request_exit(&self, account: AccountId) -> Result<u64> {
        self.inner.write().await.request_exit(account)
    }

    pub async fn withdraw_exited(&self, account: AccountId, asset: AssetId) -> Result<Pips> {
        self.inner.write().await.withdraw_exited(account, asset)
    }

    pub async fn clear_exit(&self, account: AccountId) -> Result<()> {
        self.inner.write().await.clear_exit(account)
    }

    pub async fn register_asset(
        &self,
        caller: AccountId,
        id: AssetId,
        symbol: &str,
        decimals: u8,
    ) -> Result<Asset> {
        self.inner
            .write()
            .await
            .register_asset(caller, id, symbol, decimals)
    }

    pub async fn confirm_asset(
        &self,
        caller: AccountId,
        id: AssetId,
        symbol: &str,
        decimals: u8,
    ) -> Result<Asset> {
        self.inner
            .write()
            .await
            .confirm_asset(caller, id, symbol, decimals)
    }

    pub async fn advance_sequence_to(&self, seq: u64) -> Result<()> {
        self.inner.write().await.advance_sequence_to(seq)
    }

    pub async fn balance_of(&self, account: AccountId, asset: AssetId) -> Pips {
        self.inner.read().await.balance_of(account, asset)
    }

    pub async fn fill_progress(&self, order: OrderHash) -> FillProgress {
        self.inner.read().await.fill_progress(&order)
    }

    pub async fn exit_status(&self, account: AccountId) -> ExitStatus {
        self.inner.read().await.exit_status(account)
    }

    pub async fn drain_events(&self) -> Vec<EventRecord> {
        self.inner.write().await.drain_events()
    }

    pub async fn verify_all_supply(&self) -> Result<()> {
        self.inner.read().await.verify_all_supply()
    }

    /// Direct read access for anything not wrapped above.
    pub async fn read(&self) -> RwLockReadGuard<'_, SettlementEngine<C, K>> {
        self.inner.read().await
    }

    /// Direct write access. Holding the guard blocks every other caller.
    pub async fn write(&self) -> RwLockWriteGuard<'_, SettlementEngine<C, K>> {
        self.inner.write().await
    }
}

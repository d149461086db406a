//! Ledger events for off-ledger observers.
//!
//! Every committed mutation produces exactly one [`LedgerEvent`]. Events are
//! wrapped in an [`EventRecord`] carrying a gap-free sequence number and the
//! sequencer step at which the mutation committed.

use serde::{Deserialize, Serialize};

use crate::{
    AccountId, AssetId, MarketPair, Nonce, NativeAmount, OrderHash, OrderSide, Pips,
    WithdrawalHash,
};

/// A trade that was applied to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub buy_order: OrderHash,
    pub sell_order: OrderHash,
    pub buyer: AccountId,
    pub seller: AccountId,
    pub market: MarketPair,
    pub base_asset: AssetId,
    pub quote_asset: AssetId,
    pub gross_base: Pips,
    pub gross_quote: Pips,
    pub net_base: Pips,
    pub net_quote: Pips,
    pub maker_fee: Pips,
    pub taker_fee: Pips,
    pub price: Pips,
    pub maker_side: OrderSide,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEvent {
    AssetRegistered {
        asset: AssetId,
        symbol: String,
        decimals: u8,
    },
    AssetConfirmed {
        asset: AssetId,
        symbol: String,
        decimals: u8,
        confirmed_at_ms: u64,
    },
    Deposited {
        index: u64,
        account: AccountId,
        asset: AssetId,
        native_quantity: NativeAmount,
        quantity: Pips,
        balance_after: Pips,
    },
    TradeSettled(SettlementRecord),
    Withdrawn {
        hash: WithdrawalHash,
        account: AccountId,
        asset: AssetId,
        quantity: Pips,
        fee: Pips,
        balance_after: Pips,
    },
    OrderNonceInvalidated {
        account: AccountId,
        nonce: Nonce,
        timestamp_ms: u64,
        effective_at_seq: u64,
    },
    WalletExited {
        account: AccountId,
        effective_at_seq: u64,
    },
    WalletExitWithdrawn {
        account: AccountId,
        asset: AssetId,
        quantity: Pips,
    },
    WalletExitCleared {
        account: AccountId,
    },
    DispatcherChanged {
        previous: AccountId,
        current: AccountId,
    },
    FeeWalletChanged {
        previous: AccountId,
        current: AccountId,
    },
    FeeLimitsChanged {
        max_maker_fee_bps: u64,
        max_taker_fee_bps: u64,
        max_withdrawal_fee_bps: u64,
    },
    PropagationDelayChanged {
        previous: u64,
        current: u64,
    },
}

impl LedgerEvent {
    /// Stable event name, matching the serialized variant key.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AssetRegistered { .. } => "ASSET_REGISTERED",
            Self::AssetConfirmed { .. } => "ASSET_CONFIRMED",
            Self::Deposited { .. } => "DEPOSITED",
            Self::TradeSettled(_) => "TRADE_SETTLED",
            Self::Withdrawn { .. } => "WITHDRAWN",
            Self::OrderNonceInvalidated { .. } => "ORDER_NONCE_INVALIDATED",
            Self::WalletExited { .. } => "WALLET_EXITED",
            Self::WalletExitWithdrawn { .. } => "WALLET_EXIT_WITHDRAWN",
            Self::WalletExitCleared { .. } => "WALLET_EXIT_CLEARED",
            Self::DispatcherChanged { .. } => "DISPATCHER_CHANGED",
            Self::FeeWalletChanged { .. } => "FEE_WALLET_CHANGED",
            Self::FeeLimitsChanged { .. } => "FEE_LIMITS_CHANGED",
            Self::PropagationDelayChanged { .. } => "PROPAGATION_DELAY_CHANGED",
        }
    }
}

impl std::fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A sequenced event as delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Gap-free, starting at 0.
    pub seq: u64,
    /// Sequencer step at which the mutation committed.
    pub sequencer_step: u64,
    pub event: LedgerEvent,
}

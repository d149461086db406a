//! Shared venue fixture for integration tests.

#![allow(dead_code)]

use settlex_settlement::{InMemoryCustody, ManualClock, SettlementEngine};
use settlex_types::{
    AccountId, AssetId, EngineConfig, Fill, MarketPair, NativeAmount, Nonce, Order, OrderSide, Pips,
    Result, SettlementRecord, Signature, TestWallet, Withdrawal, WithdrawalAsset,
};

pub const T0: u64 = 1_700_000_000_000;
pub const ADMIN: AccountId = AccountId([1u8; 32]);
pub const DISPATCHER: AccountId = AccountId([2u8; 32]);
pub const FEE_WALLET: AccountId = AccountId([3u8; 32]);
pub const TKN: AssetId = AssetId([0xaa; 20]);
pub const ETH: AssetId = AssetId::BASE;

/// One whole unit in pips.
pub const ONE: Pips = 100_000_000;
/// One whole unit of an 18-decimal asset in native units.
pub const NATIVE_ONE: NativeAmount = 1_000_000_000_000_000_000;
/// 0.1 quote per base, in pips.
pub const PRICE: Pips = 10_000_000;

pub type Engine = SettlementEngine<InMemoryCustody, ManualClock>;

pub struct Venue {
    pub engine: Engine,
    pub clock: ManualClock,
    pub buyer: TestWallet,
    pub seller: TestWallet,
}

pub fn market() -> MarketPair {
    MarketPair::new("TKN", "ETH")
}

/// Zero-fee fill with the seller resting.
pub fn fill(gross_base: Pips, gross_quote: Pips) -> Fill {
    Fill {
        base_asset: TKN,
        quote_asset: ETH,
        gross_base,
        gross_quote,
        net_base: gross_base,
        net_quote: gross_quote,
        maker_fee_asset: TKN,
        taker_fee_asset: ETH,
        maker_fee: 0,
        taker_fee: 0,
        price: gross_quote * ONE / gross_base.max(1),
        maker_side: OrderSide::Sell,
    }
}

impl Venue {
    pub fn new() -> Self {
        Self::with_delay(0)
    }

    /// TKN confirmed at `T0`, both traders holding 1000 TKN and 1000 ETH
    /// in their external wallets.
    pub fn with_delay(propagation_delay: u64) -> Self {
        let config = EngineConfig {
            propagation_delay,
            ..EngineConfig::with_roles(ADMIN, DISPATCHER, FEE_WALLET)
        };
        let clock = ManualClock::at(T0);
        let mut engine =
            SettlementEngine::new(config, InMemoryCustody::new(), clock.clone()).unwrap();
        engine.register_asset(ADMIN, TKN, "TKN", 18).unwrap();
        engine.confirm_asset(ADMIN, TKN, "TKN", 18).unwrap();

        let buyer = TestWallet::generate();
        let seller = TestWallet::generate();
        for wallet in [&buyer, &seller] {
            for asset in [TKN, ETH] {
                engine
                    .custody_mut()
                    .fund_wallet(wallet.account(), asset, 1_000 * NATIVE_ONE);
            }
        }
        engine.drain_events();

        Self {
            engine,
            clock,
            buyer,
            seller,
        }
    }

    /// Seller deposits 10 TKN, buyer deposits 1 ETH.
    pub fn fund(&mut self) {
        self.engine
            .deposit(self.seller.account(), Some(TKN), 10 * NATIVE_ONE)
            .unwrap();
        self.engine
            .deposit(self.buyer.account(), None, NATIVE_ONE)
            .unwrap();
    }

    pub fn buyer(&self) -> AccountId {
        self.buyer.account()
    }

    pub fn seller(&self) -> AccountId {
        self.seller.account()
    }

    pub fn limit(&self, wallet: &TestWallet, side: OrderSide, price: Pips, quantity: Pips) -> Order {
        Order::dummy_limit(wallet.account(), market(), side, price, quantity, T0 + 1_000)
    }

    pub fn limit_buy(&self, quantity: Pips) -> Order {
        self.limit(&self.buyer, OrderSide::Buy, PRICE, quantity)
    }

    pub fn limit_sell(&self, quantity: Pips) -> Order {
        self.limit(&self.seller, OrderSide::Sell, PRICE, quantity)
    }

    /// Sign with whichever trader owns the order. Unknown accounts get an
    /// unrelated signature.
    pub fn sign(&self, order: &Order) -> Signature {
        if order.account == self.seller.account() {
            self.seller.sign_order(order)
        } else {
            self.buyer.sign_order(order)
        }
    }

    pub fn settle(&mut self, buy: &Order, sell: &Order, fill: &Fill) -> Result<SettlementRecord> {
        let buy_sig = self.sign(buy);
        let sell_sig = self.sign(sell);
        self.engine
            .settle(DISPATCHER, buy, &buy_sig, sell, &sell_sig, fill)
    }

    pub fn withdrawal(&self, wallet: &TestWallet, quantity: Pips, fee: Pips) -> Withdrawal {
        Withdrawal {
            nonce: Nonce::from_timestamp_ms(T0 + 5_000),
            account: wallet.account(),
            asset: WithdrawalAsset::Symbol("TKN".to_string()),
            quantity,
            fee,
        }
    }
}

//! Signed order model.
//!
//! The wire form [`Order`] is flat: every field is part of the signed
//! content. [`Order::terms`] parses it into [`OrderTerms`], one variant per
//! order type, which is what the settlement pipeline branches on. The engine
//! never stores raw orders, only fill progress keyed by [`Order::hash`].

use serde::{Deserialize, Serialize};

use crate::{
    AccountId, LedgerError, MarketPair, Nonce, OrderHash, Pips, Result, hashing::CanonicalEncoder,
};

/// Which side of the book this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    fn code(self) -> u8 {
        match self {
            Self::Buy => 0,
            Self::Sell => 1,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// The type of order as signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
    LimitMaker,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
}

impl OrderType {
    fn code(self) -> u8 {
        match self {
            Self::Market => 0,
            Self::Limit => 1,
            Self::LimitMaker => 2,
            Self::StopLoss => 3,
            Self::StopLossLimit => 4,
            Self::TakeProfit => 5,
            Self::TakeProfitLimit => 6,
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
            Self::LimitMaker => write!(f, "LIMIT_MAKER"),
            Self::StopLoss => write!(f, "STOP_LOSS"),
            Self::StopLossLimit => write!(f, "STOP_LOSS_LIMIT"),
            Self::TakeProfit => write!(f, "TAKE_PROFIT"),
            Self::TakeProfitLimit => write!(f, "TAKE_PROFIT_LIMIT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till cancelled.
    #[default]
    Gtc,
    /// Good till crossing (post-only).
    Gtx,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
}

impl TimeInForce {
    fn code(self) -> u8 {
        match self {
            Self::Gtc => 0,
            Self::Gtx => 1,
            Self::Ioc => 2,
            Self::Fok => 3,
        }
    }
}

/// Signed self-trade-prevention policy. Carried in the hash; the engine
/// rejects every same-account fill regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelfTradePrevention {
    #[default]
    DecreaseAndCancel,
    CancelOldest,
    CancelNewest,
    CancelBoth,
}

impl SelfTradePrevention {
    fn code(self) -> u8 {
        match self {
            Self::DecreaseAndCancel => 0,
            Self::CancelOldest => 1,
            Self::CancelNewest => 2,
            Self::CancelBoth => 3,
        }
    }
}

/// A signed order. Immutable once signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub signature_version: u8,
    pub nonce: Nonce,
    pub account: AccountId,
    pub market: MarketPair,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    /// Declared total in base pips. May be zero only for quote-denominated
    /// market orders.
    pub quantity: Pips,
    /// Declared total in quote pips (market orders only).
    pub quote_order_quantity: Option<Pips>,
    pub limit_price: Option<Pips>,
    pub stop_price: Option<Pips>,
    pub client_order_id: String,
    pub self_trade_prevention: SelfTradePrevention,
    /// Expiry in milliseconds since epoch, if any.
    pub cancel_after: Option<u64>,
}

/// Parsed order terms, one variant per order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTerms {
    Market {
        quote_order_quantity: Option<Pips>,
    },
    Limit {
        limit_price: Pips,
        time_in_force: TimeInForce,
    },
    LimitMaker {
        limit_price: Pips,
    },
    StopLoss {
        stop_price: Pips,
    },
    StopLossLimit {
        limit_price: Pips,
        stop_price: Pips,
        time_in_force: TimeInForce,
    },
    TakeProfit {
        stop_price: Pips,
    },
    TakeProfitLimit {
        limit_price: Pips,
        stop_price: Pips,
        time_in_force: TimeInForce,
    },
}

impl OrderTerms {
    /// The price bound the fill must respect, if this is a limit-type order.
    #[must_use]
    pub fn limit_price(&self) -> Option<Pips> {
        match *self {
            Self::Limit { limit_price, .. }
            | Self::LimitMaker { limit_price }
            | Self::StopLossLimit { limit_price, .. }
            | Self::TakeProfitLimit { limit_price, .. } => Some(limit_price),
            Self::Market { .. } | Self::StopLoss { .. } | Self::TakeProfit { .. } => None,
        }
    }

    #[must_use]
    pub fn quote_order_quantity(&self) -> Option<Pips> {
        match *self {
            Self::Market {
                quote_order_quantity,
            } => quote_order_quantity,
            _ => None,
        }
    }
}

/// Cumulative fill bounds for an order. At least one bound is always set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillLimits {
    pub base: Option<Pips>,
    pub quote: Option<Pips>,
}

fn positive(value: Option<Pips>) -> Option<Pips> {
    value.filter(|v| *v > 0)
}

impl Order {
    /// Parse the flat wire form into typed terms.
    ///
    /// # Errors
    /// - `QuoteQuantityOnlyForMarket` if a non-market order sets a quote quantity
    /// - `ZeroQuantity` if no positive total is declared
    /// - `MissingLimitPrice` / `MissingStopPrice` for incomplete limit/stop orders
    pub fn terms(&self) -> Result<OrderTerms> {
        if self.quote_order_quantity.is_some() && self.order_type != OrderType::Market {
            return Err(LedgerError::QuoteQuantityOnlyForMarket);
        }
        match self.quote_order_quantity {
            Some(0) => return Err(LedgerError::ZeroQuantity),
            None if self.quantity == 0 => return Err(LedgerError::ZeroQuantity),
            _ => {}
        }

        let limit = || positive(self.limit_price).ok_or(LedgerError::MissingLimitPrice);
        let stop = || positive(self.stop_price).ok_or(LedgerError::MissingStopPrice);
        let time_in_force = self.time_in_force;

        Ok(match self.order_type {
            OrderType::Market => OrderTerms::Market {
                quote_order_quantity: self.quote_order_quantity,
            },
            OrderType::Limit => OrderTerms::Limit {
                limit_price: limit()?,
                time_in_force,
            },
            OrderType::LimitMaker => OrderTerms::LimitMaker {
                limit_price: limit()?,
            },
            OrderType::StopLoss => OrderTerms::StopLoss { stop_price: stop()? },
            OrderType::StopLossLimit => OrderTerms::StopLossLimit {
                limit_price: limit()?,
                stop_price: stop()?,
                time_in_force,
            },
            OrderType::TakeProfit => OrderTerms::TakeProfit { stop_price: stop()? },
            OrderType::TakeProfitLimit => OrderTerms::TakeProfitLimit {
                limit_price: limit()?,
                stop_price: stop()?,
                time_in_force,
            },
        })
    }

    /// Cumulative fill bounds: base pips and, for quote-denominated market
    /// orders, quote pips.
    #[must_use]
    pub fn fill_limits(&self) -> FillLimits {
        FillLimits {
            base: positive(Some(self.quantity)),
            quote: self
                .quote_order_quantity
                .filter(|_| self.order_type == OrderType::Market),
        }
    }

    /// Canonical signing payload.
    ///
    /// Format: `"settlex:order:v{N}:" || version || nonce || account || base ||
    /// quote || side || type || tif || quantity || quoteQty || limit || stop ||
    /// clientOrderId || stp || cancelAfter`
    #[must_use]
    pub fn encoder(&self) -> CanonicalEncoder {
        let domain = format!("settlex:order:v{}:", self.signature_version);
        let mut enc = CanonicalEncoder::new(&domain);
        enc.u8(self.signature_version)
            .bytes(self.nonce.0.as_bytes())
            .bytes(self.account.as_bytes())
            .str(&self.market.base)
            .str(&self.market.quote)
            .u8(self.side.code())
            .u8(self.order_type.code())
            .u8(self.time_in_force.code())
            .pips(self.quantity)
            .opt_pips(self.quote_order_quantity)
            .opt_pips(self.limit_price)
            .opt_pips(self.stop_price)
            .str(&self.client_order_id)
            .u8(self.self_trade_prevention.code())
            .u64(self.cancel_after.unwrap_or(0));
        enc
    }

    /// Content hash over the canonical signing payload.
    #[must_use]
    pub fn hash(&self) -> OrderHash {
        OrderHash(self.encoder().digest())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// A limit order on `base`-`quote` for `account`, signed at `timestamp_ms`.
    pub fn dummy_limit(
        account: AccountId,
        market: MarketPair,
        side: OrderSide,
        limit_price: Pips,
        quantity: Pips,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            signature_version: crate::constants::SUPPORTED_SIGNATURE_VERSION,
            nonce: Nonce::from_timestamp_ms(timestamp_ms),
            account,
            market,
            side,
            order_type: OrderType::Limit,
            time_in_force: TimeInForce::Gtc,
            quantity,
            quote_order_quantity: None,
            limit_price: Some(limit_price),
            stop_price: None,
            client_order_id: String::new(),
            self_trade_prevention: SelfTradePrevention::DecreaseAndCancel,
            cancel_after: None,
        }
    }

    /// A base-denominated market order.
    pub fn dummy_market(
        account: AccountId,
        market: MarketPair,
        side: OrderSide,
        quantity: Pips,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            order_type: OrderType::Market,
            limit_price: None,
            ..Self::dummy_limit(account, market, side, 0, quantity, timestamp_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_buy() -> Order {
        Order::dummy_limit(
            AccountId([1u8; 32]),
            MarketPair::new("TKN", "ETH"),
            OrderSide::Buy,
            10_000_000,
            1_000_000_000,
            1_700_000_000_000,
        )
    }

    #[test]
    fn order_side_display() {
        assert_eq!(format!("{}", OrderSide::Buy), "BUY");
        assert_eq!(format!("{}", OrderSide::Sell), "SELL");
    }

    #[test]
    fn limit_terms_parse() {
        let terms = limit_buy().terms().unwrap();
        assert_eq!(terms.limit_price(), Some(10_000_000));
        assert!(matches!(terms, OrderTerms::Limit { .. }));
    }

    #[test]
    fn market_terms_have_no_limit() {
        let mut order = limit_buy();
        order.order_type = OrderType::Market;
        order.limit_price = None;
        assert_eq!(order.terms().unwrap().limit_price(), None);
    }

    #[test]
    fn quote_quantity_only_for_market() {
        let mut order = limit_buy();
        order.quote_order_quantity = Some(100);
        assert_eq!(order.terms(), Err(LedgerError::QuoteQuantityOnlyForMarket));

        order.order_type = OrderType::Market;
        order.limit_price = None;
        order.quantity = 0;
        let terms = order.terms().unwrap();
        assert_eq!(terms.quote_order_quantity(), Some(100));
        assert_eq!(
            order.fill_limits(),
            FillLimits {
                base: None,
                quote: Some(100)
            }
        );
    }

    #[test]
    fn zero_quantity_rejected() {
        let mut order = limit_buy();
        order.quantity = 0;
        assert_eq!(order.terms(), Err(LedgerError::ZeroQuantity));
    }

    #[test]
    fn missing_prices_rejected() {
        let mut order = limit_buy();
        order.limit_price = None;
        assert_eq!(order.terms(), Err(LedgerError::MissingLimitPrice));

        let mut order = limit_buy();
        order.order_type = OrderType::StopLossLimit;
        assert_eq!(order.terms(), Err(LedgerError::MissingStopPrice));
        order.stop_price = Some(9_000_000);
        assert!(matches!(order.terms().unwrap(), OrderTerms::StopLossLimit { .. }));
    }

    #[test]
    fn hash_deterministic() {
        let order = limit_buy();
        assert_eq!(order.hash(), order.clone().hash());
    }

    #[test]
    fn hash_covers_every_signed_field() {
        let base = limit_buy();
        let variants: Vec<Order> = vec![
            Order { quantity: base.quantity + 1, ..base.clone() },
            Order { limit_price: Some(10_000_001), ..base.clone() },
            Order { side: OrderSide::Sell, ..base.clone() },
            Order { client_order_id: "abc".into(), ..base.clone() },
            Order { cancel_after: Some(1), ..base.clone() },
            Order { market: MarketPair::new("TKN", "USD"), ..base.clone() },
            Order { time_in_force: TimeInForce::Ioc, ..base.clone() },
        ];
        for variant in variants {
            assert_ne!(base.hash(), variant.hash(), "{variant:?}");
        }
    }

    #[test]
    fn serde_roundtrip() {
        let order = limit_buy();
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
        assert_eq!(order.hash(), back.hash());
    }
}

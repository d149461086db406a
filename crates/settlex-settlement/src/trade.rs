//! Trade settlement.
//!
//! The dispatcher submits two signed orders and the fill that matched
//! them. Checks run cheapest and most decisive first:
//!
//! 1. Neither account has a finalized exit
//! 2. Both signature versions are supported; orders sit in the right slots
//! 3. Each order's market resolves, at its own nonce time, to the fill's assets
//! 4. Distinct base/quote; fee assets in the pair and distinct
//! 5. Positive gross quantities
//! 6. Limit prices respected by the derived price
//! 7. No self-trade
//! 8. Both nonces above the accounts' invalidation floors
//! 9. Both signatures verify over the order hashes
//! 10. Fee rates within bounds
//! 11. Base and quote conserved
//! 12. Fill progress planned for both orders (no overfill)
//! 13. Balance postings validated as a batch
//!
//! Only then are fills committed, balances applied and the record emitted.

use settlex_ledger::Posting;
use settlex_types::{
    AccountId, AssetId, Fill, LedgerError, LedgerEvent, Order, OrderHash, OrderSide, OrderTerms,
    Pips, Result, SettlementRecord, Signature, constants, signing,
};

use crate::clock::Clock;
use crate::custody::Custody;
use crate::engine::SettlementEngine;

/// An order with everything the pipeline derives from it.
struct Parsed<'a> {
    order: &'a Order,
    terms: OrderTerms,
    timestamp_ms: u64,
    hash: OrderHash,
}

impl<'a> Parsed<'a> {
    fn new(order: &'a Order) -> Result<Self> {
        Ok(Self {
            order,
            terms: order.terms()?,
            timestamp_ms: order.nonce.timestamp_ms()?,
            hash: order.hash(),
        })
    }
}

/// `fee / basis <= max_bps / 10_000`, without division.
fn fee_within(fee: Pips, basis: Pips, max_bps: u64) -> bool {
    u128::from(fee) * u128::from(constants::BASIS_POINTS) <= u128::from(basis) * u128::from(max_bps)
}

impl<C: Custody, K: Clock> SettlementEngine<C, K> {
    /// Settle one matched fill between a buy and a sell order.
    ///
    /// # Errors
    /// `CallerNotDispatcher`, or the first failing check of the pipeline.
    /// Nothing is mutated on error.
    pub fn settle(
        &mut self,
        caller: AccountId,
        buy: &Order,
        buy_signature: &Signature,
        sell: &Order,
        sell_signature: &Signature,
        fill: &Fill,
    ) -> Result<SettlementRecord> {
        let result = self.try_settle(caller, buy, buy_signature, sell, sell_signature, fill);
        if let Err(err) = &result {
            tracing::warn!(
                code = %err.code(),
                buyer = %buy.account.short(),
                seller = %sell.account.short(),
                market = %buy.market,
                error = %err,
                "Settlement rejected"
            );
        }
        result
    }

    fn try_settle(
        &mut self,
        caller: AccountId,
        buy: &Order,
        buy_signature: &Signature,
        sell: &Order,
        sell_signature: &Signature,
        fill: &Fill,
    ) -> Result<SettlementRecord> {
        self.ensure_dispatcher(caller)?;
        let seq = self.current_seq;

        // 1. Exits
        if self.exits.is_blocking(buy.account, seq) {
            return Err(LedgerError::BuyAccountExited(buy.account));
        }
        if self.exits.is_blocking(sell.account, seq) {
            return Err(LedgerError::SellAccountExited(sell.account));
        }

        // 2. Versions and slots
        for order in [buy, sell] {
            if order.signature_version != constants::SUPPORTED_SIGNATURE_VERSION {
                return Err(LedgerError::UnsupportedSignatureVersion(
                    order.signature_version,
                ));
            }
        }
        if buy.side != OrderSide::Buy || sell.side != OrderSide::Sell {
            return Err(LedgerError::OrderSideMismatch {
                reason: format!("buy slot holds {}, sell slot holds {}", buy.side, sell.side),
            });
        }
        let buy = Parsed::new(buy)?;
        let sell = Parsed::new(sell)?;

        // 3. Market resolution
        for parsed in [&buy, &sell] {
            self.check_market(parsed, fill)?;
        }

        // 4. Asset pair shape
        if fill.base_asset == fill.quote_asset {
            return Err(LedgerError::SameBaseAndQuote);
        }
        for fee_asset in [fill.maker_fee_asset, fill.taker_fee_asset] {
            if fee_asset != fill.base_asset && fee_asset != fill.quote_asset {
                return Err(LedgerError::FeeAssetNotInPair(fee_asset));
            }
        }
        if fill.maker_fee_asset == fill.taker_fee_asset {
            return Err(LedgerError::FeeAssetsMustDiffer);
        }

        // 5. Quantities
        if fill.gross_base == 0 || fill.gross_quote == 0 {
            return Err(LedgerError::ZeroQuantity);
        }

        // 6. Price
        let price = fill.derived_price().ok_or(LedgerError::ZeroQuantity)?;
        match buy.terms.limit_price() {
            Some(limit) if price > u128::from(limit) => {
                return Err(LedgerError::BuyLimitExceeded { price, limit });
            }
            _ => {}
        }
        match sell.terms.limit_price() {
            Some(limit) if price < u128::from(limit) => {
                return Err(LedgerError::SellLimitExceeded { price, limit });
            }
            _ => {}
        }

        // 7. Self-trade
        if buy.order.account == sell.order.account {
            return Err(LedgerError::SelfTradeNotAllowed(buy.order.account));
        }

        // 8. Replay floors
        for parsed in [&buy, &sell] {
            self.invalidations
                .assert_order_fresh(parsed.order.account, parsed.timestamp_ms, seq)?;
        }

        // 9. Signatures
        signing::verify_digest(&buy.order.account, &buy.hash.0, buy_signature)?;
        signing::verify_digest(&sell.order.account, &sell.hash.0, sell_signature)?;

        // 10. Fee rates
        if !fee_within(
            fill.maker_fee,
            fill.fee_basis(fill.maker_fee_asset),
            self.config.max_maker_fee_bps,
        ) {
            return Err(LedgerError::ExcessiveMakerFee);
        }
        if !fee_within(
            fill.taker_fee,
            fill.fee_basis(fill.taker_fee_asset),
            self.config.max_taker_fee_bps,
        ) {
            return Err(LedgerError::ExcessiveTakerFee);
        }

        // 11. Conservation
        if u128::from(fill.net_base) + fill.fees_in(fill.base_asset) != u128::from(fill.gross_base)
        {
            return Err(LedgerError::BaseConservationViolation);
        }
        if u128::from(fill.net_quote) + fill.fees_in(fill.quote_asset)
            != u128::from(fill.gross_quote)
        {
            return Err(LedgerError::QuoteConservationViolation);
        }

        // 12. Fill progress
        let buy_update = self.fills.plan(
            buy.hash,
            buy.order.fill_limits(),
            fill.gross_base,
            fill.gross_quote,
        )?;
        let sell_update = self.fills.plan(
            sell.hash,
            sell.order.fill_limits(),
            fill.gross_base,
            fill.gross_quote,
        )?;

        // 13. Balances. `apply` validates the whole batch before storing
        // anything; fill commits below cannot fail.
        let postings = self.trade_postings(buy.order.account, sell.order.account, fill);
        self.balances.apply(&postings)?;

        self.fills.commit(buy_update);
        self.fills.commit(sell_update);

        let record = SettlementRecord {
            buy_order: buy.hash,
            sell_order: sell.hash,
            buyer: buy.order.account,
            seller: sell.order.account,
            market: buy.order.market.clone(),
            base_asset: fill.base_asset,
            quote_asset: fill.quote_asset,
            gross_base: fill.gross_base,
            gross_quote: fill.gross_quote,
            net_base: fill.net_base,
            net_quote: fill.net_quote,
            maker_fee: fill.maker_fee,
            taker_fee: fill.taker_fee,
            price: fill.price,
            maker_side: fill.maker_side,
        };
        tracing::info!(
            buy_order = %record.buy_order,
            sell_order = %record.sell_order,
            market = %record.market,
            %fill,
            buy_completed = buy_update.completes,
            sell_completed = sell_update.completes,
            "Trade settled"
        );
        self.emit(LedgerEvent::TradeSettled(record.clone()));
        Ok(record)
    }

    fn check_market(&self, parsed: &Parsed<'_>, fill: &Fill) -> Result<()> {
        let market = &parsed.order.market;
        let base = self
            .registry
            .resolve_by_symbol(&market.base, parsed.timestamp_ms)?;
        let quote = self
            .registry
            .resolve_by_symbol(&market.quote, parsed.timestamp_ms)?;
        if base.id != fill.base_asset || quote.id != fill.quote_asset {
            return Err(LedgerError::MarketResolutionMismatch {
                reason: format!(
                    "order {} resolves {market} to {}/{}, fill states {}/{}",
                    parsed.hash, base.id, quote.id, fill.base_asset, fill.quote_asset
                ),
            });
        }
        tracing::debug!(order = %parsed.hash, %market, at_ms = parsed.timestamp_ms, "Market resolved");
        Ok(())
    }

    fn trade_postings(&self, buyer: AccountId, seller: AccountId, fill: &Fill) -> Vec<Posting> {
        let fee_wallet = self.config.fee_wallet;
        let leg = |account: AccountId, asset: AssetId, amount: Pips, credit: bool| {
            if credit {
                Posting::Credit {
                    account,
                    asset,
                    amount,
                }
            } else {
                Posting::Debit {
                    account,
                    asset,
                    amount,
                }
            }
        };
        vec![
            leg(buyer, fill.quote_asset, fill.gross_quote, false),
            leg(seller, fill.base_asset, fill.gross_base, false),
            leg(buyer, fill.base_asset, fill.net_base, true),
            leg(seller, fill.quote_asset, fill.net_quote, true),
            leg(fee_wallet, fill.maker_fee_asset, fill.maker_fee, true),
            leg(fee_wallet, fill.taker_fee_asset, fill.taker_fee, true),
        ]
    }
}

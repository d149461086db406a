//! Fill descriptor for a pre-matched trade.
//!
//! A [`Fill`] is supplied by the dispatcher with every settlement call and
//! is not persisted beyond the mutation it drives.

use serde::{Deserialize, Serialize};

use crate::{AssetId, OrderSide, Pips, constants};

/// The quantities, fees and price of one matched fill between two orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub base_asset: AssetId,
    pub quote_asset: AssetId,
    pub gross_base: Pips,
    pub gross_quote: Pips,
    /// Base received by the buyer after fees.
    pub net_base: Pips,
    /// Quote received by the seller after fees.
    pub net_quote: Pips,
    pub maker_fee_asset: AssetId,
    pub taker_fee_asset: AssetId,
    pub maker_fee: Pips,
    pub taker_fee: Pips,
    /// Reported execution price in pips of quote per whole base unit.
    pub price: Pips,
    /// Which side rested on the book.
    pub maker_side: OrderSide,
}

impl Fill {
    /// Execution price implied by the gross quantities:
    /// `gross_quote * 10^8 / gross_base`. `None` if `gross_base` is zero.
    #[must_use]
    pub fn derived_price(&self) -> Option<u128> {
        if self.gross_base == 0 {
            return None;
        }
        Some(
            u128::from(self.gross_quote) * u128::from(constants::PIPS_PER_UNIT)
                / u128::from(self.gross_base),
        )
    }

    /// The gross quantity a fee in `fee_asset` is measured against.
    #[must_use]
    pub fn fee_basis(&self, fee_asset: AssetId) -> Pips {
        if fee_asset == self.base_asset {
            self.gross_base
        } else {
            self.gross_quote
        }
    }

    /// Fees charged in `asset` (maker and taker combined).
    #[must_use]
    pub fn fees_in(&self, asset: AssetId) -> u128 {
        let mut total = 0u128;
        if self.maker_fee_asset == asset {
            total += u128::from(self.maker_fee);
        }
        if self.taker_fee_asset == asset {
            total += u128::from(self.taker_fee);
        }
        total
    }
}

impl std::fmt::Display for Fill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fill[{} base / {} quote @ {}] maker={}",
            crate::pips::format_pips(self.gross_base),
            crate::pips::format_pips(self.gross_quote),
            crate::pips::format_pips(self.price),
            self.maker_side,
        )
    }
}

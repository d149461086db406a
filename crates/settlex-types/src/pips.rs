//! Precision conversion between pips and native asset units.
//!
//! A pip is 10⁻⁸ of an asset. All ledger accounting happens in pips; native
//! units only appear at the custody boundary. Converting native units to pips
//! floors the sub-pip remainder.

use rust_decimal::Decimal;

use crate::{LedgerError, Result, constants};

/// Ledger quantity in pips (10⁻⁸ of an asset).
pub type Pips = u64;

/// Quantity in an asset's native smallest unit.
pub type NativeAmount = u128;

fn scale_factor(decimals: u8) -> Result<(bool, u128)> {
    if decimals > constants::MAX_ASSET_DECIMALS {
        return Err(LedgerError::PrecisionOverflow { decimals });
    }
    let (widen, exponent) = if decimals >= constants::PIP_DECIMALS {
        (true, decimals - constants::PIP_DECIMALS)
    } else {
        (false, constants::PIP_DECIMALS - decimals)
    };
    // 10^24 is the largest factor and fits comfortably in u128.
    Ok((widen, 10u128.pow(u32::from(exponent))))
}

/// Convert pips to native units at the given decimals.
///
/// # Errors
/// - `PrecisionOverflow` if `decimals > 32`
/// - `UnitOverflow` if the result exceeds `u128`
pub fn pips_to_units(pips: Pips, decimals: u8) -> Result<NativeAmount> {
    let (widen, factor) = scale_factor(decimals)?;
    if widen {
        u128::from(pips)
            .checked_mul(factor)
            .ok_or(LedgerError::UnitOverflow { pips, decimals })
    } else {
        Ok(u128::from(pips) / factor)
    }
}

/// Convert native units to pips, flooring anything below one pip.
///
/// # Errors
/// - `PrecisionOverflow` if `decimals > 32`
/// - `PipOverflow` if the result exceeds `u64`
pub fn units_to_pips(units: NativeAmount, decimals: u8) -> Result<Pips> {
    let (widen, factor) = scale_factor(decimals)?;
    let pips = if widen {
        units / factor
    } else {
        units
            .checked_mul(factor)
            .ok_or(LedgerError::PipOverflow { units, decimals })?
    };
    Pips::try_from(pips).map_err(|_| LedgerError::PipOverflow { units, decimals })
}

/// Render a pip quantity as a fixed-point decimal with exactly 8 places.
#[must_use]
pub fn pips_to_decimal(pips: Pips) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(pips), u32::from(constants::PIP_DECIMALS))
}

/// Base-10 fixed-point string, e.g. `1_000_000_000` → `"10.00000000"`.
#[must_use]
pub fn format_pips(pips: Pips) -> String {
    pips_to_decimal(pips).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eighteen_decimals_widens() {
        assert_eq!(pips_to_units(1, 18).unwrap(), 10_000_000_000);
        assert_eq!(units_to_pips(10_000_000_000, 18).unwrap(), 1);
    }

    #[test]
    fn eight_decimals_is_identity() {
        assert_eq!(pips_to_units(123_456, 8).unwrap(), 123_456);
        assert_eq!(units_to_pips(123_456, 8).unwrap(), 123_456);
    }

    #[test]
    fn fewer_decimals_narrows() {
        // 2 decimals: 1 native unit = 0.01 = 1_000_000 pips
        assert_eq!(units_to_pips(1, 2).unwrap(), 1_000_000);
        assert_eq!(pips_to_units(1_500_000, 2).unwrap(), 1);
        assert_eq!(pips_to_units(999_999, 2).unwrap(), 0);
    }

    #[test]
    fn sub_pip_remainder_is_floored() {
        // 18 decimals: 1 pip = 10^10 units
        assert_eq!(units_to_pips(19_999_999_999, 18).unwrap(), 1);
        assert_eq!(units_to_pips(9_999_999_999, 18).unwrap(), 0);
    }

    #[test]
    fn decimals_above_32_rejected() {
        assert_eq!(
            pips_to_units(1, 33),
            Err(LedgerError::PrecisionOverflow { decimals: 33 })
        );
        assert_eq!(
            units_to_pips(1, 40),
            Err(LedgerError::PrecisionOverflow { decimals: 40 })
        );
    }

    #[test]
    fn pip_overflow_detected() {
        let units = u128::from(u64::MAX) + 1;
        assert!(matches!(
            units_to_pips(units, 8),
            Err(LedgerError::PipOverflow { .. })
        ));
        // 0 decimals multiplies by 10^8
        assert!(matches!(
            units_to_pips(u128::from(u64::MAX), 0),
            Err(LedgerError::PipOverflow { .. })
        ));
    }

    #[test]
    fn unit_overflow_detected() {
        assert!(matches!(
            pips_to_units(u64::MAX, 32),
            Err(LedgerError::UnitOverflow { .. })
        ));
    }

    #[test]
    fn round_trip_never_exceeds_input() {
        let samples: [u128; 6] = [0, 1, 7, 10_000_000_000, 123_456_789_012_345, 99_999_999_999];
        for decimals in 0..=32u8 {
            for &q in &samples {
                let Ok(pips) = units_to_pips(q, decimals) else {
                    continue;
                };
                let Ok(back) = pips_to_units(pips, decimals) else {
                    continue;
                };
                assert!(back <= q, "decimals={decimals} q={q} back={back}");
            }
        }
    }

    #[test]
    fn exact_multiples_round_trip_exactly() {
        for decimals in 0..=32u8 {
            let step = if decimals > 8 {
                10u128.pow(u32::from(decimals - 8))
            } else {
                1
            };
            let q = step * 12_345;
            let pips = units_to_pips(q, decimals).unwrap();
            assert_eq!(pips_to_units(pips, decimals).unwrap(), q, "decimals={decimals}");
        }
    }

    #[test]
    fn fixed_point_rendering() {
        assert_eq!(format_pips(1_000_000_000), "10.00000000");
        assert_eq!(format_pips(10_000_000), "0.10000000");
        assert_eq!(format_pips(0), "0.00000000");
        assert_eq!(format_pips(1), "0.00000001");
    }
}

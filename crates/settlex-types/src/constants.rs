//! System-wide constants for the Settlex settlement ledger.

/// Decimal places of a pip (1 pip = 10⁻⁸ of an asset).
pub const PIP_DECIMALS: u8 = 8;

/// Pips per whole asset unit.
pub const PIPS_PER_UNIT: u64 = 100_000_000;

/// Maximum native decimals an asset may declare.
pub const MAX_ASSET_DECIMALS: u8 = 32;

/// Symbol reserved for the implicit base asset.
pub const BASE_ASSET_SYMBOL: &str = "ETH";

/// Native decimals of the implicit base asset.
pub const BASE_ASSET_DECIMALS: u8 = 18;

/// The only order signature version this engine accepts.
pub const SUPPORTED_SIGNATURE_VERSION: u8 = 1;

/// Basis points in 100%.
pub const BASIS_POINTS: u64 = 10_000;

/// Hard ceiling on any configurable fee rate (20%).
pub const FEE_BPS_CEILING: u64 = 2_000;

/// Default maximum maker fee (1%).
pub const DEFAULT_MAX_MAKER_FEE_BPS: u64 = 100;

/// Default maximum taker fee (2%).
pub const DEFAULT_MAX_TAKER_FEE_BPS: u64 = 200;

/// Default maximum withdrawal fee (20%).
pub const DEFAULT_MAX_WITHDRAWAL_FEE_BPS: u64 = 2_000;

/// Upper bound on the propagation delay: one week of one-second sequencer steps.
pub const MAX_PROPAGATION_DELAY: u64 = 7 * 24 * 60 * 60;

/// Default propagation delay in sequencer steps.
pub const DEFAULT_PROPAGATION_DELAY: u64 = 0;

/// How far beyond "now" an invalidation timestamp may be (one day).
pub const DEFAULT_NONCE_FUTURE_TOLERANCE_MS: u64 = 24 * 60 * 60 * 1000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Settlex";

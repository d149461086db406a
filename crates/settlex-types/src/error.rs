//! Error types for the Settlex settlement ledger.
//!
//! All errors use the `SX_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Precision conversion errors
//! - 2xx: Asset registry errors
//! - 3xx: Balance ledger errors
//! - 4xx: Nonce invalidation errors
//! - 5xx: Wallet exit errors
//! - 6xx: Trade settlement errors
//! - 7xx: Deposit / withdrawal errors
//! - 8xx: Authorization / governance errors
//! - 9xx: General / internal errors
//!
//! Every error means the triggering call did not happen: no state was mutated.

use thiserror::Error;

use crate::{AccountId, AssetId, OrderHash, Pips, WithdrawalHash};

/// Central error enum for all Settlex operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // =================================================================
    // Precision Errors (1xx)
    // =================================================================
    /// Asset decimals exceed the supported maximum of 32.
    #[error("SX_ERR_100: Precision overflow: {decimals} decimals exceeds maximum")]
    PrecisionOverflow { decimals: u8 },

    /// A native amount converts to more pips than fit in 64 bits.
    #[error("SX_ERR_101: Pip overflow converting {units} units at {decimals} decimals")]
    PipOverflow { units: u128, decimals: u8 },

    /// A pip amount converts to more native units than fit in 128 bits.
    #[error("SX_ERR_102: Native unit overflow converting {pips} pips at {decimals} decimals")]
    UnitOverflow { pips: Pips, decimals: u8 },

    // =================================================================
    // Asset Registry Errors (2xx)
    // =================================================================
    /// The asset identifier has already been confirmed; registration is permanent.
    #[error("SX_ERR_200: Asset {0} registration already finalized")]
    AlreadyFinalized(AssetId),

    /// The identifier is reserved for the implicit base asset.
    #[error("SX_ERR_201: Invalid asset identifier {0}")]
    InvalidIdentifier(AssetId),

    /// The symbol is empty or reserved.
    #[error("SX_ERR_202: Invalid asset symbol {symbol:?}")]
    InvalidSymbol { symbol: String },

    /// Decimals are outside `0..=32`.
    #[error("SX_ERR_203: Decimals {decimals} out of range")]
    DecimalsOutOfRange { decimals: u8 },

    /// Nothing has been registered under this identifier.
    #[error("SX_ERR_204: Unknown asset {0}")]
    UnknownAsset(AssetId),

    /// Confirmation symbol disagrees with the registration.
    #[error("SX_ERR_205: Symbol mismatch: registered {registered:?}, confirmed {confirmed:?}")]
    SymbolMismatch {
        registered: String,
        confirmed: String,
    },

    /// Confirmation decimals disagree with the registration.
    #[error("SX_ERR_206: Decimals mismatch: registered {registered}, confirmed {confirmed}")]
    DecimalsMismatch { registered: u8, confirmed: u8 },

    /// No confirmed asset carried this symbol at the requested time.
    #[error("SX_ERR_207: No confirmed asset for symbol {symbol:?} at {at_ms}ms")]
    NoConfirmedAssetForSymbol { symbol: String, at_ms: u64 },

    /// The identifier is not registered or not yet confirmed.
    #[error("SX_ERR_208: No confirmed asset for identifier {0}")]
    NoConfirmedAssetForIdentifier(AssetId),

    // =================================================================
    // Balance Errors (3xx)
    // =================================================================
    /// Debit exceeds the stored balance.
    #[error("SX_ERR_300: Insufficient balance: need {needed} pips, have {available}")]
    InsufficientBalance { needed: Pips, available: Pips },

    /// A credit would overflow the 64-bit pip range.
    #[error("SX_ERR_301: Balance overflow")]
    Overflow,

    /// The account holds nothing of this asset.
    #[error("SX_ERR_302: No balance for account {account} in asset {asset}")]
    NoBalance { account: AccountId, asset: AssetId },

    // =================================================================
    // Nonce Invalidation Errors (4xx)
    // =================================================================
    /// The nonce does not carry a time-ordered (UUIDv7) version tag.
    #[error("SX_ERR_400: Nonce is not time-ordered")]
    NotTimeOrderedNonce,

    /// Invalidation timestamp is beyond the future tolerance window.
    #[error("SX_ERR_401: Invalidation timestamp {timestamp_ms} too far beyond now {now_ms}")]
    TimestampTooFarInFuture { timestamp_ms: u64, now_ms: u64 },

    /// Invalidation timestamp does not exceed the previous one.
    #[error("SX_ERR_402: Timestamp {timestamp_ms} already invalidated (last {last_ms})")]
    TimestampAlreadyInvalidated { timestamp_ms: u64, last_ms: u64 },

    /// The previous invalidation has not reached its effective point.
    #[error("SX_ERR_403: Previous invalidation pending until step {effective_at_seq}")]
    PreviousInvalidationPending { effective_at_seq: u64 },

    /// The order nonce is at or below the account's invalidation floor.
    #[error("SX_ERR_404: Nonce timestamp {timestamp_ms} too low (floor {floor_ms})")]
    NonceTimestampTooLow { timestamp_ms: u64, floor_ms: u64 },

    // =================================================================
    // Wallet Exit Errors (5xx)
    // =================================================================
    /// An exit is already recorded for this account.
    #[error("SX_ERR_500: Account {0} already exited")]
    AlreadyExited(AccountId),

    /// No exit is recorded, or it has not reached its effective point.
    #[error("SX_ERR_501: Exit not finalized")]
    ExitNotFinalized,

    /// No exit is recorded for this account.
    #[error("SX_ERR_502: Account {0} has not exited")]
    NotExited(AccountId),

    /// The account has a finalized exit and cannot deposit, trade, or withdraw.
    #[error("SX_ERR_503: Account {0} exited")]
    AccountExited(AccountId),

    // =================================================================
    // Settlement Errors (6xx)
    // =================================================================
    #[error("SX_ERR_600: Buy account {0} exited")]
    BuyAccountExited(AccountId),

    #[error("SX_ERR_601: Sell account {0} exited")]
    SellAccountExited(AccountId),

    #[error("SX_ERR_602: Unsupported signature version {0}")]
    UnsupportedSignatureVersion(u8),

    /// Order market symbols did not resolve to the fill's asset identifiers.
    #[error("SX_ERR_603: Market resolution mismatch: {reason}")]
    MarketResolutionMismatch { reason: String },

    #[error("SX_ERR_604: Base and quote assets are the same")]
    SameBaseAndQuote,

    #[error("SX_ERR_605: Fee asset {0} is not in the traded pair")]
    FeeAssetNotInPair(AssetId),

    #[error("SX_ERR_606: Maker and taker fee assets must differ")]
    FeeAssetsMustDiffer,

    #[error("SX_ERR_607: Quantity must be positive")]
    ZeroQuantity,

    #[error("SX_ERR_608: Buy limit exceeded: price {price} above limit {limit}")]
    BuyLimitExceeded { price: u128, limit: Pips },

    #[error("SX_ERR_609: Sell limit exceeded: price {price} below limit {limit}")]
    SellLimitExceeded { price: u128, limit: Pips },

    #[error("SX_ERR_610: Quote order quantity is only valid for market orders")]
    QuoteQuantityOnlyForMarket,

    #[error("SX_ERR_611: Limit price required for this order type")]
    MissingLimitPrice,

    #[error("SX_ERR_612: Stop price required for this order type")]
    MissingStopPrice,

    #[error("SX_ERR_613: Self-trade not allowed for account {0}")]
    SelfTradeNotAllowed(AccountId),

    /// Signature did not verify against the stated account.
    #[error("SX_ERR_614: Invalid signature for account {0}")]
    InvalidSignature(AccountId),

    #[error("SX_ERR_615: Excessive maker fee")]
    ExcessiveMakerFee,

    #[error("SX_ERR_616: Excessive taker fee")]
    ExcessiveTakerFee,

    #[error("SX_ERR_617: Base conservation violated")]
    BaseConservationViolation,

    #[error("SX_ERR_618: Quote conservation violated")]
    QuoteConservationViolation,

    #[error("SX_ERR_619: Order {0} already complete")]
    OrderAlreadyComplete(OrderHash),

    #[error("SX_ERR_620: Order {hash} overfilled")]
    OrderOverfilled { hash: OrderHash },

    /// The order submitted in the buy slot is not a buy (or vice versa).
    #[error("SX_ERR_621: Order side mismatch: {reason}")]
    OrderSideMismatch { reason: String },

    // =================================================================
    // Deposit / Withdrawal Errors (7xx)
    // =================================================================
    #[error("SX_ERR_700: Deposit quantity too low to credit a pip")]
    QuantityTooLow,

    /// Custody holdings did not increase by the transferred amount.
    #[error("SX_ERR_701: Unexpected transfer amount: expected {expected}, received {received}")]
    UnexpectedTransferAmount { expected: u128, received: u128 },

    #[error("SX_ERR_702: Excessive withdrawal fee")]
    ExcessiveWithdrawalFee,

    #[error("SX_ERR_703: Withdrawal {0} already processed")]
    AlreadyWithdrawn(WithdrawalHash),

    #[error("SX_ERR_704: Custody rejected transfer: {reason}")]
    CustodyRejected { reason: String },

    /// A short deposit could not be handed back. `received` native units
    /// remain in custody, uncredited.
    #[error("SX_ERR_705: Refund of {received} units of {asset} to {account} failed: {reason}")]
    DepositRefundFailed {
        account: AccountId,
        asset: AssetId,
        received: u128,
        reason: String,
    },

    // =================================================================
    // Authorization / Governance Errors (8xx)
    // =================================================================
    #[error("SX_ERR_800: Caller {0} is not the dispatcher")]
    CallerNotDispatcher(AccountId),

    #[error("SX_ERR_801: Caller {0} is not the admin")]
    CallerNotAdmin(AccountId),

    #[error("SX_ERR_802: Fee {bps} bps above ceiling {ceiling} bps")]
    FeeBpsAboveCeiling { bps: u64, ceiling: u64 },

    #[error("SX_ERR_803: Propagation delay {delay} outside [{min}, {max}]")]
    PropagationDelayOutOfRange { delay: u64, min: u64, max: u64 },

    #[error("SX_ERR_804: Sequence regression: current {current}, requested {requested}")]
    SequenceRegression { current: u64, requested: u64 },

    #[error("SX_ERR_805: Invalid configuration: {0}")]
    InvalidConfig(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Supply conservation invariant violated.
    #[error("SX_ERR_900: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    #[error("SX_ERR_901: Serialization error: {0}")]
    Serialization(String),

    #[error("SX_ERR_902: Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// The numeric code from the message prefix, e.g. `"SX_ERR_603"`.
    #[must_use]
    pub fn code(&self) -> String {
        let msg = self.to_string();
        msg.split(':').next().unwrap_or_default().to_string()
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_balance_display() {
        let err = LedgerError::InsufficientBalance {
            needed: 100,
            available: 50,
        };
        let msg = format!("{err}");
        assert!(msg.starts_with("SX_ERR_300"), "Got: {msg}");
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn code_extracts_prefix() {
        let err = LedgerError::AlreadyWithdrawn(WithdrawalHash([7u8; 32]));
        assert_eq!(err.code(), "SX_ERR_703");
    }

    #[test]
    fn all_errors_have_sx_err_prefix() {
        let errors = vec![
            LedgerError::PrecisionOverflow { decimals: 40 },
            LedgerError::NotTimeOrderedNonce,
            LedgerError::AlreadyExited(AccountId([1u8; 32])),
            LedgerError::SameBaseAndQuote,
            LedgerError::QuantityTooLow,
            LedgerError::CallerNotAdmin(AccountId([2u8; 32])),
            LedgerError::Internal("test".into()),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(msg.starts_with("SX_ERR_"), "Error missing SX_ERR_ prefix: {msg}");
        }
    }
}

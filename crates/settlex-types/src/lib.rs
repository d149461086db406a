//! # settlex-types
//!
//! Shared types, errors, and configuration for the **Settlex** settlement ledger.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`AssetId`], [`Nonce`], [`OrderHash`], [`WithdrawalHash`], [`MarketPair`]
//! - **Precision**: [`Pips`], [`NativeAmount`], [`pips_to_units`], [`units_to_pips`]
//! - **Asset model**: [`Asset`]
//! - **Order model**: [`Order`], [`OrderTerms`], [`OrderSide`], [`OrderType`], [`FillLimits`]
//! - **Trade model**: [`Fill`]
//! - **Withdrawal model**: [`Withdrawal`], [`WithdrawalAsset`]
//! - **Events**: [`LedgerEvent`], [`EventRecord`], [`SettlementRecord`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`LedgerError`] with `SX_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod hashing;
pub mod ids;
pub mod order;
pub mod pips;
pub mod signing;
pub mod trade;
pub mod withdrawal;

// Re-export all primary types at crate root for ergonomic imports:
//   use settlex_types::{Order, Fill, Withdrawal, ...};

pub use asset::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use ids::*;
pub use order::*;
pub use pips::{NativeAmount, Pips, format_pips, pips_to_units, units_to_pips};
pub use signing::*;
pub use trade::*;
pub use withdrawal::*;

pub use ed25519_dalek::Signature;

// Constants are accessed via `settlex_types::constants::FOO`
// (not re-exported to avoid name collisions).

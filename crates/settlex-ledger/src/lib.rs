//! # settlex-ledger
//!
//! **State plane**: the owned stores the settlement engine composes.
//!
//! ## Stores
//!
//! 1. **AssetRegistry**: two-phase asset registration, time-gated symbol resolution
//! 2. **BalanceLedger**: per-(account, asset) pip balances with atomic batch postings
//! 3. **InvalidationTracker**: per-account nonce floors with delayed effect
//! 4. **ExitTracker**: wallet exit lifecycle (requested, finalized, cleared)
//! 5. **FillTracker**: per-order fill progress and the permanent completed set
//! 6. **WithdrawalRegistry**: processed withdrawal hashes, never evicted
//!
//! No store holds hidden statics. Each is created with the engine and only
//! mutated through its methods; every method either fully applies or
//! returns an error with the store unchanged.

pub mod asset_registry;
pub mod balance_ledger;
pub mod fill_tracker;
pub mod nonce_invalidation;
pub mod wallet_exit;
pub mod withdrawal_registry;

pub use asset_registry::AssetRegistry;
pub use balance_ledger::{BalanceLedger, Posting};
pub use fill_tracker::{FillProgress, FillTracker, FillUpdate, PartialFill};
pub use nonce_invalidation::{InvalidationTracker, NonceInvalidation};
pub use wallet_exit::{ExitStatus, ExitTracker};
pub use withdrawal_registry::WithdrawalRegistry;

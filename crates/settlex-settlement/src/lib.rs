//! # settlex-settlement
//!
//! **Settlement engine**: composes the ledger stores into the operations a
//! custodial venue exposes.
//!
//! ## Operations
//!
//! - **Trades**: [`SettlementEngine::settle`] validates two signed orders and
//!   a fill, then moves balances and records fill progress
//! - **Funds**: [`SettlementEngine::deposit`] and [`SettlementEngine::withdraw`]
//!   move value across the [`Custody`] boundary
//! - **Escape hatch**: nonce invalidation and the wallet exit lifecycle,
//!   callable by account owners without the dispatcher
//! - **Governance**: admin setters and the asset registry
//!
//! ## Flow
//!
//! ```text
//! sequencer ─▶ EngineHandle (write lock) ─▶ validate everything ─▶ apply ─▶ EventLog
//! ```
//!
//! Supply conservation can be checked at any point with
//! [`SettlementEngine::verify_all_supply`].

pub mod clock;
pub mod custody;
pub mod engine;
pub mod event_log;
pub mod exit;
pub mod funds;
pub mod governance;
pub mod handle;
pub mod supply_audit;
pub mod telemetry;
pub mod trade;

pub use clock::{Clock, ManualClock, SystemClock};
pub use custody::{Custody, InMemoryCustody};
pub use engine::SettlementEngine;
pub use event_log::EventLog;
pub use handle::EngineHandle;
pub use supply_audit::SupplyAudit;
pub use telemetry::LogFormat;

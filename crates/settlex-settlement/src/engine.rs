//! The settlement engine: owned stores, sequencer position and event log.
//!
//! Operations live in sibling modules as further `impl` blocks:
//! [`crate::trade`] (settlement), [`crate::funds`] (deposit/withdraw),
//! [`crate::exit`] (invalidations and wallet exits) and
//! [`crate::governance`] (admin setters and asset registry).
//!
//! Every operation validates fully, then mutates. A returned error means
//! nothing changed.

use settlex_ledger::{
    AssetRegistry, BalanceLedger, ExitStatus, ExitTracker, FillProgress, FillTracker,
    InvalidationTracker, NonceInvalidation, WithdrawalRegistry,
};
use settlex_types::{
    AccountId, Asset, AssetId, EngineConfig, EventRecord, LedgerError, LedgerEvent, OrderHash,
    Pips, Result,
};

use crate::clock::{Clock, SystemClock};
use crate::custody::{Custody, InMemoryCustody};
use crate::event_log::EventLog;
use crate::supply_audit::SupplyAudit;

pub struct SettlementEngine<C = InMemoryCustody, K = SystemClock> {
    pub(crate) config: EngineConfig,
    pub(crate) registry: AssetRegistry,
    pub(crate) balances: BalanceLedger,
    pub(crate) invalidations: InvalidationTracker,
    pub(crate) exits: ExitTracker,
    pub(crate) fills: FillTracker,
    pub(crate) withdrawals: WithdrawalRegistry,
    pub(crate) custody: C,
    pub(crate) clock: K,
    pub(crate) supply: SupplyAudit,
    pub(crate) events: EventLog,
    /// Position of the external sequencer.
    pub(crate) current_seq: u64,
    /// Deposits accepted so far.
    pub(crate) deposit_index: u64,
}

impl<C: Custody, K: Clock> SettlementEngine<C, K> {
    /// # Errors
    /// Returns `InvalidConfig` if `config` fails validation.
    pub fn new(config: EngineConfig, custody: C, clock: K) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            dispatcher = %config.dispatcher.short(),
            fee_wallet = %config.fee_wallet.short(),
            propagation_delay = config.propagation_delay,
            "Settlement engine initialized"
        );
        Ok(Self {
            config,
            registry: AssetRegistry::new(),
            balances: BalanceLedger::new(),
            invalidations: InvalidationTracker::new(),
            exits: ExitTracker::new(),
            fills: FillTracker::new(),
            withdrawals: WithdrawalRegistry::new(),
            custody,
            clock,
            supply: SupplyAudit::new(),
            events: EventLog::new(),
            current_seq: 0,
            deposit_index: 0,
        })
    }

    /// Move the sequencer position forward.
    ///
    /// # Errors
    /// Returns `SequenceRegression` if `seq` is behind the current position.
    pub fn advance_sequence_to(&mut self, seq: u64) -> Result<()> {
        if seq < self.current_seq {
            return Err(LedgerError::SequenceRegression {
                current: self.current_seq,
                requested: seq,
            });
        }
        self.current_seq = seq;
        Ok(())
    }

    #[must_use]
    pub fn current_seq(&self) -> u64 {
        self.current_seq
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn balance_of(&self, account: AccountId, asset: AssetId) -> Pips {
        self.balances.balance_of(account, asset)
    }

    #[must_use]
    pub fn asset(&self, id: AssetId) -> Option<Asset> {
        if id.is_base() {
            return Some(Asset::base());
        }
        self.registry.get(&id).cloned()
    }

    /// Resolve a symbol as of `at_ms`.
    ///
    /// # Errors
    /// `NoConfirmedAssetForSymbol` if nothing qualifies.
    pub fn resolve_symbol(&self, symbol: &str, at_ms: u64) -> Result<Asset> {
        self.registry.resolve_by_symbol(symbol, at_ms)
    }

    #[must_use]
    pub fn fill_progress(&self, order: &OrderHash) -> FillProgress {
        self.fills.progress(order)
    }

    #[must_use]
    pub fn exit_status(&self, account: AccountId) -> ExitStatus {
        self.exits.status(account, self.current_seq)
    }

    #[must_use]
    pub fn invalidation(&self, account: AccountId) -> Option<NonceInvalidation> {
        self.invalidations.latest(&account).copied()
    }

    /// The timestamp at or below which `account`'s orders are rejected now.
    #[must_use]
    pub fn nonce_floor(&self, account: AccountId) -> u64 {
        self.invalidations
            .effective_floor(account, self.current_seq)
    }

    #[must_use]
    pub fn is_withdrawal_processed(&self, hash: &settlex_types::WithdrawalHash) -> bool {
        self.withdrawals.is_processed(hash)
    }

    #[must_use]
    pub fn deposit_count(&self) -> u64 {
        self.deposit_index
    }

    #[must_use]
    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// The external side of the custody boundary, for funding wallets and
    /// configuring the simulated transfer behaviour.
    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        self.events.pending()
    }

    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.events.drain()
    }

    /// Check `Σ balances == deposited − released` for one asset.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` if the ledger disagrees with the audit.
    pub fn verify_supply(&self, asset: AssetId) -> Result<()> {
        self.supply.verify(asset, self.balances.total_supply(asset))
    }

    /// [`Self::verify_supply`] for every asset the ledger or audit has seen.
    ///
    /// # Errors
    /// The first violation found.
    pub fn verify_all_supply(&self) -> Result<()> {
        let mut assets = self.supply.tracked_assets();
        assets.extend(self.balances.assets());
        assets.sort_unstable();
        assets.dedup();
        assets
            .into_iter()
            .try_for_each(|asset| self.verify_supply(asset))
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        let record = self.events.push(self.current_seq, event);
        tracing::debug!(seq = record.seq, event = %record.event, "Event recorded");
    }

    pub(crate) fn ensure_dispatcher(&self, caller: AccountId) -> Result<()> {
        if caller != self.config.dispatcher {
            return Err(LedgerError::CallerNotDispatcher(caller));
        }
        Ok(())
    }

    pub(crate) fn ensure_admin(&self, caller: AccountId) -> Result<()> {
        if caller != self.config.admin {
            return Err(LedgerError::CallerNotAdmin(caller));
        }
        Ok(())
    }
}

//! Append-only log of committed ledger events.

use settlex_types::{EventRecord, LedgerEvent};

/// Stamps each event with a gap-free sequence number. Draining hands the
/// buffered records to an observer; numbering continues across drains.
#[derive(Debug, Default)]
pub struct EventLog {
    next_seq: u64,
    pending: Vec<EventRecord>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sequencer_step: u64, event: LedgerEvent) -> &EventRecord {
        let record = EventRecord {
            seq: self.next_seq,
            sequencer_step,
            event,
        };
        self.next_seq += 1;
        self.pending.push(record);
        &self.pending[self.pending.len() - 1]
    }

    /// Records not yet drained.
    #[must_use]
    pub fn pending(&self) -> &[EventRecord] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.pending)
    }
}

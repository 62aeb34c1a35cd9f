//! Per-item outcomes and the run summary.

use twain_protocol::ReturnCode;

/// How a single dispatched item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Data was delivered to the sink.
    Completed,
    /// The source reported a cancel for this item.
    Cancelled,
    /// The item failed and the sink was told why.
    Failed,
}

/// What a transfer run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    /// Items handed to a mechanism.
    pub dispatched: usize,
    /// Items delivered to the sink.
    pub completed: usize,
    /// Items reported through `transfer_error`, cancels excluded.
    pub failed: usize,
    /// Items skipped by the consumer or cancelled by the source.
    pub cancelled: usize,
    /// The consumer cancelled everything and pending items were reset.
    pub reset: bool,
    /// Return code of the call that ended the loop.
    pub last_return_code: ReturnCode,
}

impl Default for TransferSummary {
    fn default() -> Self {
        Self {
            dispatched: 0,
            completed: 0,
            failed: 0,
            cancelled: 0,
            reset: false,
            last_return_code: ReturnCode::Success,
        }
    }
}

impl TransferSummary {
    /// Count one dispatched item.
    pub fn record(&mut self, outcome: ItemOutcome) {
        self.dispatched += 1;
        match outcome {
            ItemOutcome::Completed => self.completed += 1,
            ItemOutcome::Cancelled => self.cancelled += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }
}

//! Mechanism executors.
//!
//! One executor per negotiated transfer mechanism. Each runs one item from
//! state 6, may move the session to state 7 while the data is in flight, and
//! always leaves the session in state 6 again.
//!
//! ```text
//!  XferContext::image(mech)            XferContext::audio(mech)
//!     ├── Native     ─┐                   ├── Native
//!     ├── File        │ deliver()         ├── File
//!     ├── Memory      │ ──────────► sink  └── Memory/MemFile ─► Native
//!     └── MemFile    ─┘
//! ```
//!
//! Failures inside an executor never escape as errors: they are reported to
//! the sink once, after the item's buffers and temp files are released.
//! Only [`StateError`] propagates.

mod completion;
mod file;
mod memory;
mod memory_file;
mod native;

use crate::domain::error::{MechanismError, StateError, TransferError};
use crate::domain::ports::{FileStore, TransferSink};
use crate::domain::session::{Session, StateScope};
use crate::domain::value_objects::{ItemOutcome, TransferConfig};
use log::{debug, warn};
use twain_protocol::{
    DataGroups, DataSource, MemoryManager, ReturnCode, State, Status, XferMech,
};

/// Everything one item's transfer needs.
///
/// The session is held through a [`StateScope`] so it is back in state 6
/// however the executor returns.
pub(crate) struct XferContext<'c, S, M, F, K>
where
    S: DataSource,
    M: MemoryManager,
    F: FileStore,
    K: TransferSink,
{
    session: StateScope<'c, S>,
    memory: &'c M,
    files: &'c F,
    sink: &'c mut K,
    config: &'c TransferConfig,
}

impl<'c, S, M, F, K> XferContext<'c, S, M, F, K>
where
    S: DataSource,
    M: MemoryManager,
    F: FileStore,
    K: TransferSink,
{
    pub(crate) fn new(
        session: &'c mut Session<S>,
        memory: &'c M,
        files: &'c F,
        sink: &'c mut K,
        config: &'c TransferConfig,
    ) -> Self {
        Self {
            session: StateScope::new(session, State::TransferReady),
            memory,
            files,
            sink,
            config,
        }
    }

    /// Transfer one image item with the negotiated mechanism.
    pub(crate) fn image(mut self, mech: XferMech) -> Result<ItemOutcome, StateError> {
        debug!("image transfer via {:?}", mech);
        let result = match mech {
            XferMech::Native => self.native(DataGroups::IMAGE),
            XferMech::File => self.file(DataGroups::IMAGE),
            XferMech::Memory => self.memory(),
            XferMech::MemFile => self.memory_file(),
        };
        self.finish(result)
    }

    /// Transfer one audio item with the negotiated mechanism.
    ///
    /// Audio has no chunked mechanisms; those fall back to native.
    pub(crate) fn audio(mut self, mech: XferMech) -> Result<ItemOutcome, StateError> {
        debug!("audio transfer via {:?}", mech);
        let result = match mech {
            XferMech::File => self.file(DataGroups::AUDIO),
            XferMech::Native => self.native(DataGroups::AUDIO),
            XferMech::Memory | XferMech::MemFile => {
                warn!("audio does not support {:?} transfers, using native", mech);
                self.native(DataGroups::AUDIO)
            }
        };
        self.finish(result)
    }

    fn finish(
        &mut self,
        result: Result<ItemOutcome, MechanismError>,
    ) -> Result<ItemOutcome, StateError> {
        match result {
            Ok(outcome) => Ok(outcome),
            Err(MechanismError::State(e)) => Err(e),
            Err(MechanismError::Transfer(e)) => Ok(self.fail(e)),
        }
    }

    fn fail(&mut self, error: TransferError) -> ItemOutcome {
        let outcome = if error.is_cancel() {
            debug!("transfer cancelled by source");
            ItemOutcome::Cancelled
        } else {
            warn!("transfer failed: {}", error);
            ItemOutcome::Failed
        };
        self.sink.transfer_error(error);
        outcome
    }

    /// Build a source failure, attaching the source's status when it can be
    /// read.
    fn source_failure(&mut self, return_code: ReturnCode) -> Result<TransferError, StateError> {
        let mut current = Status::default();
        let status = self
            .session
            .status(&mut current)?
            .is_success()
            .then_some(current);
        Ok(TransferError::Source {
            return_code,
            status,
        })
    }

    /// Shorthand for the common "source answered with the wrong code" exit.
    fn reject(&mut self, return_code: ReturnCode) -> MechanismError {
        match self.source_failure(return_code) {
            Ok(e) => e.into(),
            Err(e) => e.into(),
        }
    }
}

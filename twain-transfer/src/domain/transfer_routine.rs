//! The outer multi-item transfer loop.

use crate::domain::error::StateError;
use crate::domain::mechanism::XferContext;
use crate::domain::ports::{FileStore, ReadyDecision, TransferReady, TransferSink};
use crate::domain::session::{Session, XferWindow};
use crate::domain::value_objects::{TransferConfig, TransferSummary};
use log::{debug, warn};
use twain_protocol::{
    CapabilityId, DataGroups, DataSource, MemoryManager, PendingXfers, XferMech,
};

/// Drives a session in state 6 through every pending item.
///
/// For each item the sink decides whether to take it. Taken items are
/// dispatched per data category to the negotiated mechanism, then the item
/// is finalized with an end-transfer request. The loop stops when the source
/// reports nothing pending, end-transfer fails, or the sink cancels
/// everything.
///
/// However `run` returns, the session ends in state 5 with the source
/// disabled.
///
/// # Examples
///
/// ```ignore
/// let summary = TransferRoutine::new(&mut session, &memory, &files, &mut sink, &config).run()?;
/// println!("{} of {} items completed", summary.completed, summary.dispatched);
/// ```
pub struct TransferRoutine<'a, S, M, F, K>
where
    S: DataSource,
    M: MemoryManager,
    F: FileStore,
    K: TransferSink,
{
    session: &'a mut Session<S>,
    memory: &'a M,
    files: &'a F,
    sink: &'a mut K,
    config: &'a TransferConfig,
}

impl<'a, S, M, F, K> TransferRoutine<'a, S, M, F, K>
where
    S: DataSource,
    M: MemoryManager,
    F: FileStore,
    K: TransferSink,
{
    /// Bind a routine to its session and collaborators.
    pub fn new(
        session: &'a mut Session<S>,
        memory: &'a M,
        files: &'a F,
        sink: &'a mut K,
        config: &'a TransferConfig,
    ) -> Self {
        Self {
            session,
            memory,
            files,
            sink,
            config,
        }
    }

    /// Run the loop.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the session is not in state 6, or when a
    /// request turns out to be illegal mid-loop. Per-item failures are
    /// reported to the sink instead and do not stop the loop.
    pub fn run(self) -> Result<TransferSummary, StateError> {
        let Self {
            session,
            memory,
            files,
            sink,
            config,
        } = self;

        let mut window = XferWindow::open(session)?;
        let mut summary = TransferSummary::default();
        let mut pending = PendingXfers::default();

        loop {
            let rc = window.pending_xfers(&mut pending)?;
            if !rc.is_success() {
                debug!("pending count unavailable ({}), keeping {}", rc, pending.count);
            }

            let ready = TransferReady {
                pending_count: pending.count,
                end_of_job: pending.is_end_of_job(),
                image_info: window.fetch_image_info()?,
                audio_info: window.fetch_audio_info()?,
            };

            match sink.transfer_ready(&ready) {
                ReadyDecision::CancelAll => {
                    let rc = window.reset_pending_xfers(&mut pending)?;
                    debug!("all pending items cancelled, reset returned {}", rc);
                    summary.reset = true;
                    summary.last_return_code = rc;
                    break;
                }
                ReadyDecision::CancelCurrent => {
                    debug!("item skipped by consumer");
                    summary.cancelled += 1;
                }
                ReadyDecision::Proceed => {
                    dispatch(&mut *window, memory, files, &mut *sink, config, &mut summary)?;
                }
            }

            let rc = window.end_xfer(&mut pending)?;
            summary.last_return_code = rc;
            if !rc.is_success() {
                warn!("end of transfer returned {}, stopping", rc);
                break;
            }
            if !pending.has_more() {
                break;
            }
            debug!("{} items still pending", pending.count);
        }

        debug!(
            "transfer loop finished: {} dispatched, {} completed, {} failed",
            summary.dispatched, summary.completed, summary.failed
        );
        Ok(summary)
    }
}

/// Transfer the current item once per data category it carries.
fn dispatch<S, M, F, K>(
    session: &mut Session<S>,
    memory: &M,
    files: &F,
    sink: &mut K,
    config: &TransferConfig,
    summary: &mut TransferSummary,
) -> Result<(), StateError>
where
    S: DataSource,
    M: MemoryManager,
    F: FileStore,
    K: TransferSink,
{
    let mut groups = DataGroups::empty();
    if !session.xfer_group(&mut groups)?.is_success() {
        groups = DataGroups::empty();
    }
    if groups.is_empty() && config.assumes_image_group() {
        warn!("source reported no transfer group, assuming image");
        groups = DataGroups::IMAGE;
    }

    if groups.contains(DataGroups::IMAGE) {
        let mech = negotiated_mech(session, CapabilityId::ImageXferMech)?;
        let outcome = XferContext::new(session, memory, files, sink, config).image(mech)?;
        summary.record(outcome);
    }
    if groups.contains(DataGroups::AUDIO) {
        let mech = negotiated_mech(session, CapabilityId::AudioXferMech)?;
        let outcome = XferContext::new(session, memory, files, sink, config).audio(mech)?;
        summary.record(outcome);
    }
    Ok(())
}

/// The mechanism the source is set to use, native when it cannot say.
fn negotiated_mech<S: DataSource>(
    session: &mut Session<S>,
    cap: CapabilityId,
) -> Result<XferMech, StateError> {
    let mut raw = 0u16;
    let rc = session.current_capability(cap, &mut raw)?;
    if !rc.is_success() {
        debug!("{:?} unavailable ({}), using native", cap, rc);
        return Ok(XferMech::Native);
    }
    let mech = XferMech::from_raw(raw);
    if mech.raw() != raw {
        warn!("unknown transfer mechanism {} for {:?}, using native", raw, cap);
    }
    Ok(mech)
}

//! State-checked request surface over a data source.
//!
//! Every request goes through a `Session` method that runs the
//! [`StateGuard`](crate::domain::StateGuard) before touching the source.
//! Control requests live here; image and audio requests live in their own
//! modules.

mod audio;
mod image;
mod scope;

pub(crate) use scope::{StateScope, XferWindow};

use crate::domain::{error::StateError, state_guard::StateGuard};
use core::ops::RangeInclusive;
use log::{trace, warn};
use twain_protocol::{
    CapabilityId, DataArgumentType, DataGroups, DataSource, Message, PendingXfers, ReturnCode,
    SetupFileXfer, SetupMemXfer, State, Status, Triplet,
};

const SOURCE_OPEN_TO_XFER: RangeInclusive<State> = State::SourceOpened..=State::Transferring;
const SOURCE_OPEN_TO_READY: RangeInclusive<State> = State::SourceOpened..=State::TransferReady;
const READY_TO_XFER: RangeInclusive<State> = State::TransferReady..=State::Transferring;
const READY_ONLY: RangeInclusive<State> = State::TransferReady..=State::TransferReady;
const ENABLED_ONLY: RangeInclusive<State> = State::SourceEnabled..=State::SourceEnabled;

/// An opened data source plus the protocol state it is in.
///
/// The session owns the source. The state is tracked here, not queried from
/// the source: it moves only through [`notify_xfer_ready`](Self::notify_xfer_ready)
/// and the transfer routine.
pub struct Session<S: DataSource> {
    source: S,
    state: State,
    groups: DataGroups,
    enabled: bool,
}

impl<S: DataSource> Session<S> {
    /// Wrap an opened source.
    ///
    /// `groups` are the data groups the source supports. The source counts as
    /// enabled when `state` is 5 or higher.
    pub fn new(source: S, groups: DataGroups, state: State) -> Self {
        Self {
            source,
            state,
            groups,
            enabled: state >= State::SourceEnabled,
        }
    }

    /// The current protocol state.
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Data groups the source supports.
    #[inline]
    pub fn supported_groups(&self) -> DataGroups {
        self.groups
    }

    /// `true` until the source has been disabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Read access to the source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consume the session and return the source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Record that the source signalled data ready (state 5 to 6).
    pub fn notify_xfer_ready(&mut self) -> Result<(), StateError> {
        StateGuard::require(
            self.state,
            ENABLED_ONLY,
            self.groups,
            Triplet::control(DataArgumentType::Null, Message::XferReady),
        )?;
        self.change_state(State::TransferReady);
        Ok(())
    }

    pub(crate) fn change_state(&mut self, state: State) {
        if self.state != state {
            trace!("session {} -> {}", self.state, state);
            self.state = state;
        }
    }

    #[inline]
    fn verify(&self, allowed: RangeInclusive<State>, triplet: Triplet) -> Result<(), StateError> {
        StateGuard::require(self.state, allowed, self.groups, triplet)
    }

    /// Read the pending-item descriptor.
    pub fn pending_xfers(&mut self, pending: &mut PendingXfers) -> Result<ReturnCode, StateError> {
        self.verify(
            SOURCE_OPEN_TO_XFER,
            Triplet::control(DataArgumentType::PendingXfers, Message::Get),
        )?;
        Ok(self.source.get_pending_xfers(pending))
    }

    /// Finalize the current item. `pending` receives the remaining count.
    pub fn end_xfer(&mut self, pending: &mut PendingXfers) -> Result<ReturnCode, StateError> {
        self.verify(
            READY_TO_XFER,
            Triplet::control(DataArgumentType::PendingXfers, Message::EndXfer),
        )?;
        Ok(self.source.end_xfer(pending))
    }

    /// Drop every pending item.
    pub fn reset_pending_xfers(
        &mut self,
        pending: &mut PendingXfers,
    ) -> Result<ReturnCode, StateError> {
        self.verify(
            READY_ONLY,
            Triplet::control(DataArgumentType::PendingXfers, Message::Reset),
        )?;
        Ok(self.source.reset_pending_xfers(pending))
    }

    /// Read the buffer sizes for chunked transfers.
    pub fn setup_mem_xfer(&mut self, setup: &mut SetupMemXfer) -> Result<ReturnCode, StateError> {
        self.verify(
            SOURCE_OPEN_TO_READY,
            Triplet::control(DataArgumentType::SetupMemXfer, Message::Get),
        )?;
        Ok(self.source.get_setup_mem_xfer(setup))
    }

    /// Read the destination for file transfers.
    pub fn setup_file_xfer(&mut self, setup: &mut SetupFileXfer) -> Result<ReturnCode, StateError> {
        self.verify(
            SOURCE_OPEN_TO_READY,
            Triplet::control(DataArgumentType::SetupFileXfer, Message::Get),
        )?;
        Ok(self.source.get_setup_file_xfer(setup))
    }

    /// Read the data categories of the pending item.
    pub fn xfer_group(&mut self, groups: &mut DataGroups) -> Result<ReturnCode, StateError> {
        self.verify(
            SOURCE_OPEN_TO_READY,
            Triplet::control(DataArgumentType::XferGroup, Message::Get),
        )?;
        Ok(self.source.get_xfer_group(groups))
    }

    /// Read the current value of a one-value capability.
    pub fn current_capability(
        &mut self,
        cap: CapabilityId,
        value: &mut u16,
    ) -> Result<ReturnCode, StateError> {
        self.verify(
            SOURCE_OPEN_TO_XFER,
            Triplet::control(DataArgumentType::Capability, Message::GetCurrent),
        )?;
        Ok(self.source.get_current_capability(cap, value))
    }

    /// Whether the source supports `cap`. Answered from negotiation results,
    /// no request is issued.
    pub fn supports_capability(&self, cap: CapabilityId) -> bool {
        self.source.supports_capability(cap)
    }

    /// Read the source status.
    pub fn status(&mut self, status: &mut Status) -> Result<ReturnCode, StateError> {
        self.verify(
            SOURCE_OPEN_TO_XFER,
            Triplet::control(DataArgumentType::Status, Message::Get),
        )?;
        Ok(self.source.get_status(status))
    }

    /// Disable the source. Legal only in state 5.
    pub fn disable_source(&mut self) -> Result<ReturnCode, StateError> {
        self.verify(
            ENABLED_ONLY,
            Triplet::control(DataArgumentType::UserInterface, Message::DisableDs),
        )?;
        let rc = self.source.disable();
        if rc.is_success() {
            self.enabled = false;
        } else {
            warn!("source refused to disable: {}", rc);
        }
        Ok(rc)
    }
}

#[cfg(test)]
pub(crate) mod test_source {
    //! Minimal scripted source for unit tests in this crate.

    use twain_protocol::*;

    #[derive(Default)]
    pub struct StubSource {
        pub calls: Vec<&'static str>,
        pub remaining: u16,
        pub disable_rc: Option<ReturnCode>,
    }

    impl DataSource for StubSource {
        fn get_pending_xfers(&mut self, pending: &mut PendingXfers) -> ReturnCode {
            self.calls.push("pending");
            pending.count = self.remaining;
            ReturnCode::Success
        }
        fn end_xfer(&mut self, pending: &mut PendingXfers) -> ReturnCode {
            self.calls.push("end_xfer");
            self.remaining = self.remaining.saturating_sub(1);
            pending.count = self.remaining;
            ReturnCode::Success
        }
        fn reset_pending_xfers(&mut self, pending: &mut PendingXfers) -> ReturnCode {
            self.calls.push("reset");
            self.remaining = 0;
            pending.count = 0;
            ReturnCode::Success
        }
        fn get_setup_mem_xfer(&mut self, _: &mut SetupMemXfer) -> ReturnCode {
            ReturnCode::Failure
        }
        fn get_setup_file_xfer(&mut self, _: &mut SetupFileXfer) -> ReturnCode {
            ReturnCode::Failure
        }
        fn get_xfer_group(&mut self, _: &mut DataGroups) -> ReturnCode {
            ReturnCode::Failure
        }
        fn get_current_capability(&mut self, _: CapabilityId, _: &mut u16) -> ReturnCode {
            ReturnCode::Failure
        }
        fn supports_capability(&self, _: CapabilityId) -> bool {
            false
        }
        fn get_status(&mut self, _: &mut Status) -> ReturnCode {
            ReturnCode::Success
        }
        fn disable(&mut self) -> ReturnCode {
            self.calls.push("disable");
            self.disable_rc.unwrap_or(ReturnCode::Success)
        }
        fn get_image_info(&mut self, _: &mut ImageInfo) -> ReturnCode {
            self.calls.push("image_info");
            ReturnCode::Success
        }
        fn get_ext_image_info(&mut self, _: &mut ExtImageInfo) -> ReturnCode {
            ReturnCode::Failure
        }
        fn image_layout(&mut self, _: Message, _: &mut ImageLayout) -> ReturnCode {
            self.calls.push("layout");
            ReturnCode::Success
        }
        fn image_native_xfer(&mut self, _: &mut Handle) -> ReturnCode {
            ReturnCode::Failure
        }
        fn image_file_xfer(&mut self) -> ReturnCode {
            ReturnCode::Failure
        }
        fn image_mem_xfer(&mut self, _: &mut ImageMemXfer) -> ReturnCode {
            ReturnCode::Failure
        }
        fn image_mem_file_xfer(&mut self, _: &mut ImageMemXfer) -> ReturnCode {
            ReturnCode::Failure
        }
        fn get_audio_info(&mut self, _: &mut AudioInfo) -> ReturnCode {
            self.calls.push("audio_info");
            ReturnCode::Success
        }
        fn audio_native_xfer(&mut self, _: &mut Handle) -> ReturnCode {
            ReturnCode::Failure
        }
        fn audio_file_xfer(&mut self) -> ReturnCode {
            ReturnCode::Failure
        }
    }
}

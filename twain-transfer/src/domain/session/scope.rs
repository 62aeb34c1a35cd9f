//! Guards that put the session back into a known state on every exit path.

use super::{Session, READY_ONLY};
use crate::domain::{error::StateError, state_guard::StateGuard};
use core::ops::{Deref, DerefMut};
use log::{debug, warn};
use twain_protocol::{DataArgumentType, DataSource, Message, State, Triplet};

/// Borrow of a session that restores a fixed state when dropped.
///
/// Mechanisms run inside one of these so the session is back in state 6
/// whatever way the mechanism returns.
pub(crate) struct StateScope<'a, S: DataSource> {
    session: &'a mut Session<S>,
    restore: State,
}

impl<'a, S: DataSource> StateScope<'a, S> {
    pub(crate) fn new(session: &'a mut Session<S>, restore: State) -> Self {
        Self { session, restore }
    }
}

impl<S: DataSource> Deref for StateScope<'_, S> {
    type Target = Session<S>;

    fn deref(&self) -> &Session<S> {
        self.session
    }
}

impl<S: DataSource> DerefMut for StateScope<'_, S> {
    fn deref_mut(&mut self) -> &mut Session<S> {
        self.session
    }
}

impl<S: DataSource> Drop for StateScope<'_, S> {
    fn drop(&mut self) {
        self.session.change_state(self.restore);
    }
}

/// The transfer window: open in state 6, closed by forcing state 5 and
/// disabling the source.
pub(crate) struct XferWindow<'a, S: DataSource> {
    session: &'a mut Session<S>,
}

impl<'a, S: DataSource> XferWindow<'a, S> {
    /// Open the window. Fails without side effects unless the session is in
    /// state 6.
    pub(crate) fn open(session: &'a mut Session<S>) -> Result<Self, StateError> {
        StateGuard::require(
            session.state(),
            READY_ONLY,
            session.supported_groups(),
            Triplet::control(DataArgumentType::PendingXfers, Message::Get),
        )?;
        Ok(Self { session })
    }
}

impl<S: DataSource> Deref for XferWindow<'_, S> {
    type Target = Session<S>;

    fn deref(&self) -> &Session<S> {
        self.session
    }
}

impl<S: DataSource> DerefMut for XferWindow<'_, S> {
    fn deref_mut(&mut self) -> &mut Session<S> {
        self.session
    }
}

impl<S: DataSource> Drop for XferWindow<'_, S> {
    fn drop(&mut self) {
        self.session.change_state(State::SourceEnabled);
        match self.session.disable_source() {
            Ok(rc) if rc.is_success() => debug!("transfer window closed, source disabled"),
            Ok(rc) => warn!("transfer window closed, disable returned {}", rc),
            Err(e) => warn!("transfer window closed, disable refused: {}", e),
        }
    }
}

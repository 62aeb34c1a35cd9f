//! Native executor: the whole item in one source-allocated block.

use super::XferContext;
use crate::domain::entities::NativeBuffer;
use crate::domain::error::MechanismError;
use crate::domain::ports::{FileStore, Payload, TransferSink};
use crate::domain::value_objects::ItemOutcome;
use log::trace;
use twain_protocol::{DataGroups, DataSource, Handle, MemoryManager, ReturnCode, State};

impl<S, M, F, K> XferContext<'_, S, M, F, K>
where
    S: DataSource,
    M: MemoryManager,
    F: FileStore,
    K: TransferSink,
{
    pub(super) fn native(&mut self, group: DataGroups) -> Result<ItemOutcome, MechanismError> {
        let mut handle = Handle::NULL;
        let rc = if group == DataGroups::AUDIO {
            self.session.audio_native_xfer(&mut handle)?
        } else {
            self.session.image_native_xfer(&mut handle)?
        };
        if rc != ReturnCode::XferDone {
            // Nothing was handed over, so there is nothing to free
            return Err(self.reject(rc));
        }
        self.session.change_state(State::Transferring);

        let buffer = NativeBuffer::adopt(self.memory, handle)?;
        let locked = buffer.lock()?;
        trace!("native block {} locked at {}", handle, locked.address());
        self.deliver(group, Payload::Native(locked.native_data()))?;
        Ok(ItemOutcome::Completed)
    }
}

//! File executor: the source writes the item to a file it was told about.

use super::XferContext;
use crate::domain::error::MechanismError;
use crate::domain::ports::{FileStore, Payload, TransferSink};
use crate::domain::value_objects::ItemOutcome;
use log::debug;
use std::path::PathBuf;
use twain_protocol::{DataGroups, DataSource, MemoryManager, ReturnCode, SetupFileXfer, State};

impl<S, M, F, K> XferContext<'_, S, M, F, K>
where
    S: DataSource,
    M: MemoryManager,
    F: FileStore,
    K: TransferSink,
{
    pub(super) fn file(&mut self, group: DataGroups) -> Result<ItemOutcome, MechanismError> {
        let mut setup = SetupFileXfer::default();
        let rc = self.session.setup_file_xfer(&mut setup)?;
        if !rc.is_success() {
            return Err(self.reject(rc));
        }

        let rc = if group == DataGroups::AUDIO {
            self.session.audio_file_xfer()?
        } else {
            self.session.image_file_xfer()?
        };
        if rc != ReturnCode::XferDone {
            return Err(self.reject(rc));
        }
        self.session.change_state(State::Transferring);

        debug!("source wrote {}", setup.file_name);
        self.deliver(group, Payload::File(PathBuf::from(setup.file_name)))?;
        Ok(ItemOutcome::Completed)
    }
}

//! Memory-file executor: chunks streamed into a temp file, renamed on
//! completion.

use super::XferContext;
use super::memory::ChunkRequest;
use crate::domain::entities::{NativeBuffer, TempFile};
use crate::domain::error::MechanismError;
use crate::domain::ports::{FileStore, Payload, TransferSink};
use crate::domain::value_objects::ItemOutcome;
use twain_protocol::{DataGroups, DataSource, MemoryManager, ReturnCode, SetupFileXfer};

impl<S, M, F, K> XferContext<'_, S, M, F, K>
where
    S: DataSource,
    M: MemoryManager,
    F: FileStore,
    K: TransferSink,
{
    pub(super) fn memory_file(&mut self) -> Result<ItemOutcome, MechanismError> {
        let setup = self.setup_mem()?;
        let mut file_setup = SetupFileXfer::default();
        let rc = self.session.setup_file_xfer(&mut file_setup)?;
        if !rc.is_success() {
            return Err(self.reject(rc));
        }

        let buffer = NativeBuffer::allocate(self.memory, self.config.chunk_size(&setup)?)?;
        let mut temp = TempFile::create(self.files)?;
        let rc = self.pump_chunks(&buffer, ChunkRequest::MemoryFile, &mut temp)?;
        drop(buffer);
        if rc != ReturnCode::XferDone {
            return Err(self.reject(rc));
        }

        let target = temp.path().with_extension(file_setup.format.extension());
        let path = temp.persist(&target)?;
        self.deliver(DataGroups::IMAGE, Payload::File(path))?;
        Ok(ItemOutcome::Completed)
    }
}

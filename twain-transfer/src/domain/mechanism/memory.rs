//! Memory executor and the chunk pump shared with memory-file transfers.

use super::XferContext;
use crate::domain::entities::NativeBuffer;
use crate::domain::error::MechanismError;
use crate::domain::ports::{FileStore, Payload, TransferSink};
use crate::domain::value_objects::ItemOutcome;
use log::{debug, trace};
use std::io::Write;
use twain_protocol::{
    DataGroups, DataSource, ImageMemXfer, MemoryError, MemoryManager, ReturnCode, SetupMemXfer,
    State,
};

/// Which chunk request the pump issues.
#[derive(Debug, Clone, Copy)]
pub(super) enum ChunkRequest {
    Memory,
    MemoryFile,
}

impl<S, M, F, K> XferContext<'_, S, M, F, K>
where
    S: DataSource,
    M: MemoryManager,
    F: FileStore,
    K: TransferSink,
{
    pub(super) fn memory(&mut self) -> Result<ItemOutcome, MechanismError> {
        let setup = self.setup_mem()?;
        let buffer = NativeBuffer::allocate(self.memory, self.config.chunk_size(&setup)?)?;

        let mut data = Vec::new();
        let rc = self.pump_chunks(&buffer, ChunkRequest::Memory, &mut data)?;
        drop(buffer);
        if rc != ReturnCode::XferDone {
            return Err(self.reject(rc));
        }

        self.deliver(DataGroups::IMAGE, Payload::Memory(data))?;
        Ok(ItemOutcome::Completed)
    }

    /// Buffer sizes the source accepts.
    pub(super) fn setup_mem(&mut self) -> Result<SetupMemXfer, MechanismError> {
        let mut setup = SetupMemXfer::default();
        let rc = self.session.setup_mem_xfer(&mut setup)?;
        if !rc.is_success() {
            return Err(self.reject(rc));
        }
        Ok(setup)
    }

    /// Request chunks into `buffer` and append each one to `out` until the
    /// source answers with anything but success.
    ///
    /// Returns the code that ended the loop: `XferDone` when the item is
    /// complete. A chunk that claims more bytes than the buffer holds is a
    /// memory error.
    pub(super) fn pump_chunks<W: Write>(
        &mut self,
        buffer: &NativeBuffer<'_, M>,
        request: ChunkRequest,
        out: &mut W,
    ) -> Result<ReturnCode, MechanismError> {
        let length = buffer.len().unwrap_or(0);
        let capacity = length as usize;
        let mut scratch = vec![0u8; capacity];
        let mut chunks = 0usize;
        let mut total = 0u64;

        loop {
            let mut xfer = ImageMemXfer::for_buffer(buffer.handle(), length);
            let rc = match request {
                ChunkRequest::Memory => self.session.image_mem_xfer(&mut xfer)?,
                ChunkRequest::MemoryFile => self.session.image_mem_file_xfer(&mut xfer)?,
            };
            if rc != ReturnCode::Success && rc != ReturnCode::XferDone {
                debug!("chunk loop ended by {} after {} chunks", rc, chunks);
                return Ok(rc);
            }
            self.session.change_state(State::Transferring);

            let written = xfer.bytes_written as usize;
            if written > capacity {
                return Err(MemoryError::OutOfBounds {
                    offset: 0,
                    len: written,
                    size: capacity,
                }
                .into());
            }
            let chunk = &mut scratch[..written];
            buffer.lock()?.read(0, chunk)?;
            out.write_all(chunk)?;
            chunks += 1;
            total += chunk.len() as u64;
            trace!("chunk {}: {} bytes", chunks, chunk.len());

            if rc == ReturnCode::XferDone {
                debug!("{} chunks, {} bytes", chunks, total);
                return Ok(rc);
            }
        }
    }
}

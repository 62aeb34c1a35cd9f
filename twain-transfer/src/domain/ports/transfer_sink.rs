//! TransferSink port - the consumer of transfer events.

use crate::domain::error::TransferError;
use core::fmt;
use std::path::PathBuf;
use twain_protocol::{
    Address, AudioInfo, DataGroups, ExtImageInfo, Handle, ImageInfo, MemoryError, MemoryManager,
};

/// What the consumer wants done with the pending item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyDecision {
    /// Transfer the item.
    #[default]
    Proceed,
    /// Skip this item; the source still advances its queue.
    CancelCurrent,
    /// Drop every pending item and end the loop.
    CancelAll,
}

/// Raised once per item before anything is transferred.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferReady {
    /// Items the source reports as pending, including this one.
    /// `0xFFFF` means unknown.
    pub pending_count: u16,
    /// Job control reports no further separator.
    pub end_of_job: bool,
    /// Descriptor of the pending image, when the source could provide it.
    pub image_info: Option<ImageInfo>,
    /// Descriptor of the pending audio item, when the source could provide it.
    pub audio_info: Option<AudioInfo>,
}

/// A locked native block, readable only for the duration of the callback.
///
/// The block is unlocked and freed as soon as
/// [`TransferSink::data_transferred`] returns. Copy out what you need.
#[derive(Clone, Copy)]
pub struct NativeData<'a> {
    handle: Handle,
    address: Address,
    memory: &'a dyn MemoryManager,
}

impl<'a> NativeData<'a> {
    pub(crate) fn new(handle: Handle, address: Address, memory: &'a dyn MemoryManager) -> Self {
        Self { handle, address, memory }
    }

    /// The handle the source allocated.
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Where the locked block is readable.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Copy `dest.len()` bytes starting at `offset` out of the block.
    pub fn read(&self, offset: usize, dest: &mut [u8]) -> Result<(), MemoryError> {
        self.memory.read(self.address, offset, dest)
    }
}

impl fmt::Debug for NativeData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeData")
            .field("handle", &self.handle)
            .field("address", &self.address)
            .finish()
    }
}

/// The transferred data. Its shape follows the mechanism.
#[derive(Debug)]
pub enum Payload<'a> {
    /// Native mechanism: the source's block, locked.
    Native(NativeData<'a>),
    /// Memory mechanism: every chunk, in arrival order.
    Memory(Vec<u8>),
    /// File and memory-file mechanisms: where the data now lives.
    File(PathBuf),
}

/// One completed item.
#[derive(Debug)]
pub struct DataTransferred<'a> {
    /// The data category this payload belongs to.
    pub group: DataGroups,
    /// The data.
    pub payload: Payload<'a>,
    /// Image descriptor, when available (image items only).
    pub image_info: Option<ImageInfo>,
    /// Extended image info, when supported and available. Item handles are
    /// freed after the callback returns.
    pub ext_image_info: Option<&'a ExtImageInfo>,
    /// Audio descriptor, when available (audio items only).
    pub audio_info: Option<AudioInfo>,
}

/// The consumer of transfer events.
///
/// Called synchronously on the thread running the transfer routine. A host
/// that needs events elsewhere marshals them itself.
pub trait TransferSink {
    /// An item is pending. The answer decides what happens to it.
    fn transfer_ready(&mut self, ready: &TransferReady) -> ReadyDecision;

    /// An item was transferred.
    fn data_transferred(&mut self, data: DataTransferred<'_>);

    /// An item failed. Raised exactly once per failed item, after the item's
    /// buffers and temp files have been released.
    fn transfer_error(&mut self, error: TransferError);
}

impl<K: TransferSink + ?Sized> TransferSink for &mut K {
    fn transfer_ready(&mut self, ready: &TransferReady) -> ReadyDecision {
        (**self).transfer_ready(ready)
    }

    fn data_transferred(&mut self, data: DataTransferred<'_>) {
        (**self).data_transferred(data)
    }

    fn transfer_error(&mut self, error: TransferError) {
        (**self).transfer_error(error)
    }
}

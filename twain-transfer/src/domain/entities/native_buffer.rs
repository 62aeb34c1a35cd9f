//! NativeBuffer entity - an owned block of source-shared memory.

use crate::domain::ports::NativeData;
use log::trace;
use twain_protocol::{Address, Handle, MemoryError, MemoryManager};

/// An owned memory block, freed exactly once when dropped.
///
/// Created either by allocating a chunk buffer or by adopting a handle the
/// source allocated for a native transfer.
///
/// # Examples
///
/// ```
/// use twain_transfer::{HeapMemory, NativeBuffer};
///
/// let memory = HeapMemory::new();
/// {
///     let buffer = NativeBuffer::allocate(&memory, 16).unwrap();
///     let locked = buffer.lock().unwrap();
///     let mut out = [0u8; 4];
///     locked.read(0, &mut out).unwrap();
/// }
/// assert_eq!(memory.live_blocks(), 0);
/// ```
pub struct NativeBuffer<'m, M: MemoryManager> {
    memory: &'m M,
    handle: Handle,
    len: Option<u32>,
}

impl<'m, M: MemoryManager> NativeBuffer<'m, M> {
    /// Allocate a block of `size` bytes.
    pub fn allocate(memory: &'m M, size: u32) -> Result<Self, MemoryError> {
        let handle = memory.allocate(size)?;
        trace!("allocated {} bytes as {}", size, handle);
        Ok(Self {
            memory,
            handle,
            len: Some(size),
        })
    }

    /// Take ownership of a block the source allocated.
    ///
    /// The size of an adopted block is unknown; reads are bounds-checked by
    /// the memory manager only.
    pub fn adopt(memory: &'m M, handle: Handle) -> Result<Self, MemoryError> {
        if handle.is_null() {
            return Err(MemoryError::NullHandle);
        }
        Ok(Self {
            memory,
            handle,
            len: None,
        })
    }

    /// The owned handle.
    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Size in bytes, when known.
    #[inline]
    pub fn len(&self) -> Option<u32> {
        self.len
    }

    /// Lock the block for reading. Unlocked when the guard drops.
    pub fn lock(&self) -> Result<LockedBuffer<'_, M>, MemoryError> {
        let address = self.memory.lock(self.handle)?;
        Ok(LockedBuffer {
            memory: self.memory,
            handle: self.handle,
            address,
            len: self.len,
        })
    }
}

impl<M: MemoryManager> Drop for NativeBuffer<'_, M> {
    fn drop(&mut self) {
        trace!("freeing {}", self.handle);
        self.memory.free(self.handle);
    }
}

/// A lock on a [`NativeBuffer`]. The borrow keeps the block alive, so the
/// unlock always happens before the free.
pub struct LockedBuffer<'b, M: MemoryManager> {
    memory: &'b M,
    handle: Handle,
    address: Address,
    len: Option<u32>,
}

impl<'b, M: MemoryManager> LockedBuffer<'b, M> {
    /// Where the block is readable.
    #[inline]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Copy `dest.len()` bytes starting at `offset` out of the block.
    pub fn read(&self, offset: usize, dest: &mut [u8]) -> Result<(), MemoryError> {
        if let Some(size) = self.len {
            let size = size as usize;
            if offset.checked_add(dest.len()).is_none_or(|end| end > size) {
                return Err(MemoryError::OutOfBounds {
                    offset,
                    len: dest.len(),
                    size,
                });
            }
        }
        self.memory.read(self.address, offset, dest)
    }

    /// Borrowed view handed to the sink for native deliveries.
    pub fn native_data(&self) -> NativeData<'b> {
        NativeData::new(self.handle, self.address, self.memory)
    }
}

impl<M: MemoryManager> Drop for LockedBuffer<'_, M> {
    fn drop(&mut self) {
        self.memory.unlock(self.address);
    }
}

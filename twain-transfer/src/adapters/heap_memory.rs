//! Heap-backed memory manager.

use log::warn;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use twain_protocol::{Address, Handle, MemoryError, MemoryManager};

struct Block {
    data: Vec<u8>,
    locks: u32,
}

/// [`MemoryManager`] over host heap blocks.
///
/// Blocks are addressed by their handle value: locking a handle returns an
/// address with the same raw value. Single-threaded; wrap it yourself if the
/// source calls back from another thread.
///
/// The source side of a session uses [`allocate_with`](Self::allocate_with)
/// and [`write`](Self::write) to produce native blocks and fill chunk
/// buffers.
pub struct HeapMemory {
    blocks: RefCell<HashMap<usize, Block>>,
    next: Cell<usize>,
    limit: Option<usize>,
}

impl Default for HeapMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl HeapMemory {
    /// An unbounded heap.
    pub fn new() -> Self {
        Self {
            blocks: RefCell::new(HashMap::new()),
            next: Cell::new(1),
            limit: None,
        }
    }

    /// A heap that refuses allocations once `bytes` are live.
    pub fn with_limit(bytes: usize) -> Self {
        Self {
            limit: Some(bytes),
            ..Self::new()
        }
    }

    /// Number of blocks allocated and not yet freed.
    pub fn live_blocks(&self) -> usize {
        self.blocks.borrow().len()
    }

    /// Whether `handle` is currently locked.
    pub fn is_locked(&self, handle: Handle) -> bool {
        self.blocks
            .borrow()
            .get(&handle.as_raw())
            .is_some_and(|b| b.locks > 0)
    }

    /// Allocate a block holding a copy of `data`.
    pub fn allocate_with(&self, data: &[u8]) -> Result<Handle, MemoryError> {
        let size = u32::try_from(data.len())
            .map_err(|_| MemoryError::AllocationFailed { size: u32::MAX })?;
        let handle = self.allocate(size)?;
        self.write(handle, 0, data)?;
        Ok(handle)
    }

    /// Copy `data` into a block at `offset`. Does not require a lock.
    pub fn write(&self, handle: Handle, offset: usize, data: &[u8]) -> Result<(), MemoryError> {
        let mut blocks = self.blocks.borrow_mut();
        let block = blocks
            .get_mut(&handle.as_raw())
            .ok_or(MemoryError::InvalidHandle(handle))?;
        let size = block.data.len();
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= size)
            .ok_or(MemoryError::OutOfBounds {
                offset,
                len: data.len(),
                size,
            })?;
        block.data[offset..end].copy_from_slice(data);
        Ok(())
    }

    fn live_bytes(&self) -> usize {
        self.blocks.borrow().values().map(|b| b.data.len()).sum()
    }
}

impl MemoryManager for HeapMemory {
    fn allocate(&self, size: u32) -> Result<Handle, MemoryError> {
        if let Some(limit) = self.limit {
            if self.live_bytes() + size as usize > limit {
                return Err(MemoryError::AllocationFailed { size });
            }
        }
        let raw = self.next.get();
        self.next.set(raw + 1);
        self.blocks.borrow_mut().insert(
            raw,
            Block {
                data: vec![0; size as usize],
                locks: 0,
            },
        );
        Ok(Handle::from_raw(raw))
    }

    fn free(&self, handle: Handle) {
        if handle.is_null() {
            return;
        }
        match self.blocks.borrow_mut().remove(&handle.as_raw()) {
            Some(block) if block.locks > 0 => warn!("freed {} while still locked", handle),
            Some(_) => {}
            None => warn!("free of unknown handle {}", handle),
        }
    }

    fn lock(&self, handle: Handle) -> Result<Address, MemoryError> {
        if handle.is_null() {
            return Err(MemoryError::NullHandle);
        }
        let mut blocks = self.blocks.borrow_mut();
        let block = blocks
            .get_mut(&handle.as_raw())
            .ok_or(MemoryError::InvalidHandle(handle))?;
        block.locks += 1;
        Ok(Address::from_raw(handle.as_raw()))
    }

    fn unlock(&self, address: Address) {
        if address.is_null() {
            return;
        }
        match self.blocks.borrow_mut().get_mut(&address.as_raw()) {
            Some(block) if block.locks > 0 => block.locks -= 1,
            Some(_) => warn!("unlock of {} which is not locked", address),
            None => warn!("unlock of unknown address {}", address),
        }
    }

    fn read(&self, address: Address, offset: usize, dest: &mut [u8]) -> Result<(), MemoryError> {
        let blocks = self.blocks.borrow();
        let block = blocks
            .get(&address.as_raw())
            .filter(|b| b.locks > 0)
            .ok_or(MemoryError::NotLocked(address))?;
        let size = block.data.len();
        let end = offset
            .checked_add(dest.len())
            .filter(|&end| end <= size)
            .ok_or(MemoryError::OutOfBounds {
                offset,
                len: dest.len(),
                size,
            })?;
        dest.copy_from_slice(&block.data[offset..end]);
        Ok(())
    }
}

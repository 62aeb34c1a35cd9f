//! Shared-memory boundary between the application and a data source.

use core::fmt;

/// A handle to a block of source-shared memory.
///
/// The zero handle is null. Whoever allocated a handle decides who frees it:
/// memory the source hands over (native transfers, extended info items) is
/// freed by the application, and buffers the application allocates for
/// chunked transfers are freed by the application as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Handle(usize);

impl Handle {
    /// The null handle.
    pub const NULL: Self = Self(0);

    /// Wrap a raw handle value.
    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[inline]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    /// `true` for the null handle.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#x})", self.0)
    }
}

/// The address a locked handle is readable at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Address(usize);

impl Address {
    /// The null address.
    pub const NULL: Self = Self(0);

    /// Wrap a raw address.
    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// The raw address.
    #[inline]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    /// `true` for the null address.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#x})", self.0)
    }
}

/// Failures of the memory primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MemoryError {
    /// The allocator could not provide `size` bytes.
    AllocationFailed {
        /// Requested size in bytes.
        size: u32,
    },
    /// The handle is unknown or was already freed.
    InvalidHandle(Handle),
    /// A null handle was used where data was expected.
    NullHandle,
    /// The address does not belong to a locked block.
    NotLocked(Address),
    /// A read went past the end of the block.
    OutOfBounds {
        /// Offset of the read.
        offset: usize,
        /// Length of the read.
        len: usize,
        /// Size of the block.
        size: usize,
    },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { size } => write!(f, "Failed to allocate {} bytes", size),
            Self::InvalidHandle(h) => write!(f, "Invalid or freed handle {}", h),
            Self::NullHandle => write!(f, "Source returned a null handle"),
            Self::NotLocked(a) => write!(f, "{} is not a locked block", a),
            Self::OutOfBounds { offset, len, size } => write!(
                f,
                "Read of {} bytes at offset {} exceeds block of {} bytes",
                len, offset, size
            ),
        }
    }
}

impl core::error::Error for MemoryError {}

/// Allocate/lock/unlock/free primitives over source-shared memory.
///
/// Methods take `&self`: the native primitives are process-global and
/// implementations use interior mutability. Every method must treat the
/// null handle or null address as a no-op (or an error for `lock`/`read`),
/// never as undefined behaviour.
///
/// # Ordering
///
/// A block must be locked before it is read and unlocked before it is freed.
/// Once freed, a handle is never used again.
pub trait MemoryManager {
    /// Allocate `size` bytes. The caller owns the returned handle.
    fn allocate(&self, size: u32) -> Result<Handle, MemoryError>;

    /// Release a block. No-op for the null handle.
    fn free(&self, handle: Handle);

    /// Lock a block and return the address it is readable at.
    fn lock(&self, handle: Handle) -> Result<Address, MemoryError>;

    /// Unlock a block previously locked at `address`. No-op for null.
    fn unlock(&self, address: Address);

    /// Copy `dest.len()` bytes starting at `offset` out of a locked block.
    fn read(&self, address: Address, offset: usize, dest: &mut [u8]) -> Result<(), MemoryError>;
}

impl<M: MemoryManager + ?Sized> MemoryManager for &M {
    fn allocate(&self, size: u32) -> Result<Handle, MemoryError> {
        (**self).allocate(size)
    }

    fn free(&self, handle: Handle) {
        (**self).free(handle)
    }

    fn lock(&self, handle: Handle) -> Result<Address, MemoryError> {
        (**self).lock(handle)
    }

    fn unlock(&self, address: Address) {
        (**self).unlock(address)
    }

    fn read(&self, address: Address, offset: usize, dest: &mut [u8]) -> Result<(), MemoryError> {
        (**self).read(address, offset, dest)
    }
}

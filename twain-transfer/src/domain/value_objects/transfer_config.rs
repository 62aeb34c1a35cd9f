//! TransferConfig value object - tunables for a transfer run.

use crate::domain::error::TransferError;
use core::fmt;
use twain_protocol::{DONT_CARE_32, ExtInfoId, SetupMemXfer};

/// Chunk size used when the source expresses no preference.
pub const DEFAULT_CHUNK_SIZE: u32 = 64 * 1024;

/// Upper bound on a single chunk buffer.
pub const MAX_CHUNK_SIZE: u32 = 16 * 1024 * 1024;

/// Invalid transfer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferConfigError {
    /// A chunk size of zero.
    ZeroChunkSize,
    /// The default chunk size is larger than the maximum.
    DefaultExceedsMax {
        /// Requested default.
        default: u32,
        /// Requested maximum.
        max: u32,
    },
}

impl fmt::Display for TransferConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroChunkSize => write!(f, "chunk size must be non-zero"),
            Self::DefaultExceedsMax { default, max } => {
                write!(f, "default chunk size {} exceeds maximum {}", default, max)
            }
        }
    }
}

impl core::error::Error for TransferConfigError {}

/// Tunables for a transfer run.
///
/// # Example
///
/// ```
/// use twain_transfer::TransferConfig;
/// use twain_transfer::twain_protocol::SetupMemXfer;
///
/// let config = TransferConfig::new().with_chunk_sizes(4096, 1 << 20).unwrap();
/// let setup = SetupMemXfer { min_buf_size: 0, max_buf_size: 0, preferred: 0 };
/// assert_eq!(config.chunk_size(&setup).unwrap(), 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConfig {
    default_chunk_size: u32,
    max_chunk_size: u32,
    ext_info_ids: Vec<ExtInfoId>,
    assume_image_group: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: DEFAULT_CHUNK_SIZE,
            max_chunk_size: MAX_CHUNK_SIZE,
            ext_info_ids: Vec::new(),
            assume_image_group: true,
        }
    }
}

impl TransferConfig {
    /// Defaults: 64 KiB chunks capped at 16 MiB, no extended info ids and
    /// image assumed when the source reports no transfer group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback and maximum chunk sizes.
    pub fn with_chunk_sizes(mut self, default: u32, max: u32) -> Result<Self, TransferConfigError> {
        if default == 0 || max == 0 {
            return Err(TransferConfigError::ZeroChunkSize);
        }
        if default > max {
            return Err(TransferConfigError::DefaultExceedsMax { default, max });
        }
        self.default_chunk_size = default;
        self.max_chunk_size = max;
        Ok(self)
    }

    /// Extended image info attributes requested for each delivered image.
    pub fn with_ext_info_ids(mut self, ids: impl IntoIterator<Item = ExtInfoId>) -> Self {
        self.ext_info_ids = ids.into_iter().collect();
        self
    }

    /// Whether an empty transfer group is treated as image.
    pub fn with_assume_image_group(mut self, assume: bool) -> Self {
        self.assume_image_group = assume;
        self
    }

    /// Fallback chunk size.
    pub fn default_chunk_size(&self) -> u32 {
        self.default_chunk_size
    }

    /// Maximum chunk size.
    pub fn max_chunk_size(&self) -> u32 {
        self.max_chunk_size
    }

    /// Requested extended image info attributes.
    pub fn ext_info_ids(&self) -> &[ExtInfoId] {
        &self.ext_info_ids
    }

    /// Whether an empty transfer group is treated as image.
    pub fn assumes_image_group(&self) -> bool {
        self.assume_image_group
    }

    /// Pick the chunk buffer size for a memory transfer.
    ///
    /// The source's preferred size wins, then its maximum, then the
    /// configured default. The result is capped at the configured maximum
    /// but never below the source's minimum. A source minimum above the
    /// configured maximum is refused.
    pub fn chunk_size(&self, setup: &SetupMemXfer) -> Result<u32, TransferError> {
        let usable = |size: u32| size != 0 && size != DONT_CARE_32;
        if usable(setup.min_buf_size) && setup.min_buf_size > self.max_chunk_size {
            return Err(TransferError::ChunkSize {
                min: setup.min_buf_size,
                max: self.max_chunk_size,
            });
        }
        let size = if usable(setup.preferred) {
            setup.preferred
        } else if usable(setup.max_buf_size) {
            setup.max_buf_size
        } else {
            self.default_chunk_size
        };
        let size = size.min(self.max_chunk_size);
        if usable(setup.min_buf_size) {
            Ok(size.max(setup.min_buf_size))
        } else {
            Ok(size)
        }
    }
}

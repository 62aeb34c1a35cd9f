//! Domain-level errors.
//!
//! Only [`StateError`] ever leaves the transfer routine. Everything that goes
//! wrong while moving one item's data becomes a [`TransferError`] delivered to
//! the sink, after the item's resources have been released.

use core::fmt;
use std::io;
use twain_protocol::{DataGroups, MemoryError, ReturnCode, State, Status, Triplet};

/// A request was issued outside its legal protocol state or data group.
///
/// This is an integration error: the core is being driven in a way the
/// protocol forbids. It is never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateError {
    /// The session is not in a state where the triplet is legal.
    InvalidState {
        /// The triplet that was refused.
        triplet: Triplet,
        /// The session's state.
        current: State,
        /// Lowest legal state.
        min: State,
        /// Highest legal state.
        max: State,
    },

    /// The triplet's data group is not supported by the source.
    UnsupportedGroup {
        /// The triplet that was refused.
        triplet: Triplet,
        /// The groups the source supports.
        supported: DataGroups,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState { triplet, current, min, max } => write!(
                f,
                "{} is only valid in states {} to {}, session is in {}",
                triplet,
                min.number(),
                max.number(),
                current.number()
            ),
            Self::UnsupportedGroup { triplet, supported } => write!(
                f,
                "{} targets a data group the source does not support ({:?})",
                triplet, supported
            ),
        }
    }
}

impl core::error::Error for StateError {}

/// Why one item's transfer failed. Delivered to the sink, never returned.
#[derive(Debug)]
#[non_exhaustive]
pub enum TransferError {
    /// The source answered a mechanism request with a code other than
    /// success or done.
    Source {
        /// The code the source returned.
        return_code: ReturnCode,
        /// Source status read right after the failure, when available.
        status: Option<Status>,
    },

    /// A memory primitive failed while handling a buffer.
    Memory(MemoryError),

    /// A filesystem operation failed.
    Io(io::Error),

    /// The source's minimum buffer size is above the configured maximum.
    ChunkSize {
        /// Minimum the source accepts.
        min: u32,
        /// Configured maximum chunk size.
        max: u32,
    },
}

impl TransferError {
    /// The return code for source failures.
    pub fn return_code(&self) -> Option<ReturnCode> {
        match self {
            Self::Source { return_code, .. } => Some(*return_code),
            _ => None,
        }
    }

    /// `true` when the source reported the transfer as cancelled.
    pub fn is_cancel(&self) -> bool {
        self.return_code() == Some(ReturnCode::Cancel)
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source { return_code, status: Some(status) } => {
                write!(f, "Source returned {} ({})", return_code, status)
            }
            Self::Source { return_code, status: None } => {
                write!(f, "Source returned {}", return_code)
            }
            Self::Memory(e) => write!(f, "Memory error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::ChunkSize { min, max } => write!(
                f,
                "source needs chunks of at least {} bytes, limit is {}",
                min, max
            ),
        }
    }
}

impl core::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Memory(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Source { .. } | Self::ChunkSize { .. } => None,
        }
    }
}

impl From<MemoryError> for TransferError {
    fn from(err: MemoryError) -> Self {
        Self::Memory(err)
    }
}

impl From<io::Error> for TransferError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Internal error of a mechanism body: either abort the call stack or
/// report to the sink.
#[derive(Debug)]
pub(crate) enum MechanismError {
    State(StateError),
    Transfer(TransferError),
}

impl From<StateError> for MechanismError {
    fn from(err: StateError) -> Self {
        Self::State(err)
    }
}

impl From<TransferError> for MechanismError {
    fn from(err: TransferError) -> Self {
        Self::Transfer(err)
    }
}

impl From<MemoryError> for MechanismError {
    fn from(err: MemoryError) -> Self {
        Self::Transfer(TransferError::Memory(err))
    }
}

impl From<io::Error> for MechanismError {
    fn from(err: io::Error) -> Self {
        Self::Transfer(TransferError::Io(err))
    }
}

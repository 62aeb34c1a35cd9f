//! Return codes, condition codes and the source status record.

use core::fmt;

/// Status returned by every protocol request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ReturnCode {
    /// The request completed.
    Success = 0,
    /// The request failed; the source status carries the condition.
    Failure = 1,
    /// Partially completed, check the source status.
    CheckStatus = 2,
    /// The transfer was cancelled at the source.
    Cancel = 3,
    /// The event belongs to the source.
    DsEvent = 4,
    /// The event does not belong to the source.
    NotDsEvent = 5,
    /// All data for the current item has been transferred.
    XferDone = 6,
    /// No more entries in an enumeration.
    EndOfList = 7,
    /// Requested extended info is not supported.
    InfoNotSupported = 8,
    /// Requested data is not available.
    DataNotAvailable = 9,
    /// The source is busy.
    Busy = 10,
    /// The scanner is locked by another application.
    ScannerLocked = 11,
}

impl ReturnCode {
    /// Decode a raw return code. Unknown values map to [`ReturnCode::Failure`].
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::Success,
            2 => Self::CheckStatus,
            3 => Self::Cancel,
            4 => Self::DsEvent,
            5 => Self::NotDsEvent,
            6 => Self::XferDone,
            7 => Self::EndOfList,
            8 => Self::InfoNotSupported,
            9 => Self::DataNotAvailable,
            10 => Self::Busy,
            11 => Self::ScannerLocked,
            _ => Self::Failure,
        }
    }

    /// The raw protocol value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self as u16
    }

    /// `true` for [`ReturnCode::Success`].
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.raw())
    }
}

/// Condition code carried by the source status record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConditionCode {
    /// No error.
    #[default]
    Success,
    /// Unspecified failure.
    Bummer,
    /// Not enough memory to complete the operation.
    LowMemory,
    /// No data source.
    NoDs,
    /// The source is connected to the maximum number of applications.
    MaxConnections,
    /// The source or manager reported an error to the user.
    OperationError,
    /// Unknown capability.
    BadCap,
    /// Unrecognized triplet.
    BadProtocol,
    /// Data parameter out of range.
    BadValue,
    /// Message received out of sequence.
    SeqError,
    /// Unknown destination application or source.
    BadDest,
    /// The capability is not supported by the source.
    CapUnsupported,
    /// The operation is not supported by the capability.
    CapBadOperation,
    /// The capability depends on another capability.
    CapSeqError,
    /// The file system operation was denied.
    Denied,
    /// The file already exists.
    FileExists,
    /// The file was not found.
    FileNotFound,
    /// The directory is not empty.
    NotEmpty,
    /// The feeder is jammed.
    PaperJam,
    /// The feeder detected a double feed.
    PaperDoubleFeed,
    /// Error writing the output file.
    FileWriteError,
    /// The device went offline.
    CheckDeviceOnline,
    /// Any value this crate does not name.
    Other(u16),
}

impl ConditionCode {
    /// Decode a raw condition code.
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Self::Success,
            1 => Self::Bummer,
            2 => Self::LowMemory,
            3 => Self::NoDs,
            4 => Self::MaxConnections,
            5 => Self::OperationError,
            6 => Self::BadCap,
            9 => Self::BadProtocol,
            10 => Self::BadValue,
            11 => Self::SeqError,
            12 => Self::BadDest,
            13 => Self::CapUnsupported,
            14 => Self::CapBadOperation,
            15 => Self::CapSeqError,
            16 => Self::Denied,
            17 => Self::FileExists,
            18 => Self::FileNotFound,
            19 => Self::NotEmpty,
            20 => Self::PaperJam,
            21 => Self::PaperDoubleFeed,
            22 => Self::FileWriteError,
            23 => Self::CheckDeviceOnline,
            other => Self::Other(other),
        }
    }
}

/// Source status record (`DG_CONTROL / DAT_STATUS / MSG_GET`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    /// The condition behind the last failing request.
    pub condition_code: ConditionCode,
    /// Source-specific detail, often zero.
    pub data: u16,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "condition {:?} (data {})", self.condition_code, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_code_raw_values() {
        for raw in [0u16, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11] {
            assert_eq!(ReturnCode::from_raw(raw).raw(), raw);
        }
        assert_eq!(ReturnCode::from_raw(1), ReturnCode::Failure);
        assert_eq!(ReturnCode::from_raw(999), ReturnCode::Failure);
    }

    #[test]
    fn test_return_code_display() {
        assert_eq!(format!("{}", ReturnCode::XferDone), "XferDone(6)");
    }

    #[test]
    fn test_condition_code_other() {
        assert_eq!(ConditionCode::from_raw(20), ConditionCode::PaperJam);
        assert_eq!(ConditionCode::from_raw(0x8001), ConditionCode::Other(0x8001));
    }

    #[test]
    fn test_default_status_is_success() {
        assert_eq!(Status::default().condition_code, ConditionCode::Success);
    }
}

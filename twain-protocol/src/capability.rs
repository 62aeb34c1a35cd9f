//! Capability identifiers and the transfer mechanism enumeration.

/// Capabilities the transfer window reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityId {
    /// `ICAP_XFERMECH`: image transfer mechanism.
    ImageXferMech,
    /// `ACAP_XFERMECH`: audio transfer mechanism.
    AudioXferMech,
    /// `ICAP_EXTIMAGEINFO`: extended image info is available.
    ExtImageInfo,
    /// Any capability this crate does not name.
    Other(u16),
}

impl CapabilityId {
    /// The raw capability id.
    pub const fn raw(self) -> u16 {
        match self {
            Self::ImageXferMech => 0x0103,
            Self::AudioXferMech => 0x1202,
            Self::ExtImageInfo => 0x112F,
            Self::Other(raw) => raw,
        }
    }

    /// Decode a raw capability id.
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            0x0103 => Self::ImageXferMech,
            0x1202 => Self::AudioXferMech,
            0x112F => Self::ExtImageInfo,
            other => Self::Other(other),
        }
    }
}

/// How one item's data crosses the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum XferMech {
    /// The source hands over one native handle.
    #[default]
    Native = 0,
    /// The source writes straight to a file it was told about.
    File = 1,
    /// The source fills an application buffer chunk by chunk.
    Memory = 2,
    /// Chunked like `Memory`, with the application writing chunks to a file.
    MemFile = 4,
}

impl XferMech {
    /// Decode a capability value. Unknown values fall back to `Native`.
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            1 => Self::File,
            2 => Self::Memory,
            4 => Self::MemFile,
            _ => Self::Native,
        }
    }

    /// The raw capability value.
    #[inline]
    pub const fn raw(self) -> u16 {
        self as u16
    }
}

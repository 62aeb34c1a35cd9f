//! Fixed-layout records exchanged with a data source.

use crate::{Handle, ReturnCode};
use alloc::string::String;
use alloc::vec::Vec;
use bitflags::bitflags;

/// The "don't care" sentinel for 32-bit sizes.
pub const DONT_CARE_32: u32 = 0xFFFF_FFFF;

/// Pending-item descriptor (`DAT_PENDINGXFERS`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingXfers {
    /// Items still awaiting transfer. `0xFFFF` means the source does not know.
    pub count: u16,
    /// Job control flag reported by the source.
    pub end_of_job: u32,
}

impl PendingXfers {
    /// Count value for "unknown, but more than zero".
    pub const UNKNOWN_COUNT: u16 = 0xFFFF;

    /// `true` when the source reports no further job separator.
    #[inline]
    pub const fn is_end_of_job(&self) -> bool {
        self.end_of_job == 0
    }

    /// `true` while the source still reports items (including unknown).
    #[inline]
    pub const fn has_more(&self) -> bool {
        self.count != 0
    }
}

/// Buffer sizes the source accepts for chunked transfers (`DAT_SETUPMEMXFER`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupMemXfer {
    /// Smallest usable buffer.
    pub min_buf_size: u32,
    /// Largest usable buffer.
    pub max_buf_size: u32,
    /// Size the source prefers.
    pub preferred: u32,
}

/// File destination for file transfers (`DAT_SETUPFILEXFER`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupFileXfer {
    /// Destination path the source will write to.
    pub file_name: String,
    /// Negotiated file format.
    pub format: FileFormat,
}

/// Image file formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum FileFormat {
    #[default]
    Tiff = 0,
    Pict = 1,
    Bmp = 2,
    Xbm = 3,
    Jfif = 4,
    Fpx = 5,
    TiffMulti = 6,
    Png = 7,
    Spiff = 8,
    Exif = 9,
    Pdf = 10,
    Jp2 = 11,
    Jpx = 13,
    Dejavu = 14,
    PdfA = 15,
    PdfA2 = 16,
}

impl FileFormat {
    /// Decode a raw format value.
    pub const fn from_raw(raw: u16) -> Option<Self> {
        Some(match raw {
            0 => Self::Tiff,
            1 => Self::Pict,
            2 => Self::Bmp,
            3 => Self::Xbm,
            4 => Self::Jfif,
            5 => Self::Fpx,
            6 => Self::TiffMulti,
            7 => Self::Png,
            8 => Self::Spiff,
            9 => Self::Exif,
            10 => Self::Pdf,
            11 => Self::Jp2,
            13 => Self::Jpx,
            14 => Self::Dejavu,
            15 => Self::PdfA,
            16 => Self::PdfA2,
            _ => return None,
        })
    }

    /// File extension used for files of this format, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Tiff | Self::TiffMulti => "tif",
            Self::Pict => "pict",
            Self::Bmp => "bmp",
            Self::Xbm => "xbm",
            Self::Jfif | Self::Exif | Self::Spiff => "jpg",
            Self::Fpx => "fpx",
            Self::Png => "png",
            Self::Pdf | Self::PdfA | Self::PdfA2 => "pdf",
            Self::Jp2 => "jp2",
            Self::Jpx => "jpx",
            Self::Dejavu => "djvu",
        }
    }
}

bitflags! {
    /// Ownership and addressing flags of a memory descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemoryFlags: u32 {
        /// The application owns the block.
        const APP_OWNS = 0x0001;
        /// The source manager owns the block.
        const DSM_OWNS = 0x0002;
        /// The source owns the block.
        const DS_OWNS = 0x0004;
        /// `handle` is a pointer.
        const POINTER = 0x0008;
        /// `handle` is a handle that must be locked.
        const HANDLE = 0x0010;
    }
}

/// Memory descriptor embedded in chunk records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryRef {
    /// Ownership and addressing flags.
    pub flags: MemoryFlags,
    /// Size of the block in bytes.
    pub length: u32,
    /// The block.
    pub handle: Handle,
}

/// Per-chunk record of a memory transfer (`DAT_IMAGEMEMXFER`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageMemXfer {
    /// Compression of the chunk data.
    pub compression: u16,
    /// Bytes per row in the chunk.
    pub bytes_per_row: u32,
    /// Columns in the chunk.
    pub columns: u32,
    /// Rows in the chunk.
    pub rows: u32,
    /// Horizontal offset of the chunk in the image.
    pub x_offset: u32,
    /// Vertical offset of the chunk in the image.
    pub y_offset: u32,
    /// Bytes the source wrote into `memory` for this chunk.
    pub bytes_written: u32,
    /// The application buffer the source writes into.
    pub memory: MemoryRef,
}

impl ImageMemXfer {
    /// A record pointing the source at an application-owned buffer.
    pub fn for_buffer(handle: Handle, length: u32) -> Self {
        Self {
            memory: MemoryRef {
                flags: MemoryFlags::APP_OWNS | MemoryFlags::POINTER,
                length,
                handle,
            },
            ..Self::default()
        }
    }
}

/// Descriptor of the pending or transferred image (`DAT_IMAGEINFO`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageInfo {
    /// Horizontal resolution in pixels per unit.
    pub x_resolution: f32,
    /// Vertical resolution in pixels per unit.
    pub y_resolution: f32,
    /// Width in pixels. `-1` when unknown.
    pub image_width: i32,
    /// Height in pixels. `-1` when unknown.
    pub image_length: i32,
    /// Samples per pixel.
    pub samples_per_pixel: i16,
    /// Bits per sample, per channel.
    pub bits_per_sample: [i16; 8],
    /// Bits per pixel.
    pub bits_per_pixel: i16,
    /// `true` for planar data.
    pub planar: bool,
    /// Pixel type.
    pub pixel_type: i16,
    /// Compression scheme.
    pub compression: u16,
}

/// Extended image info id (`TWEI_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ExtInfoId(pub u16);

/// One extended image info entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtInfoEntry {
    /// The requested info.
    pub info_id: ExtInfoId,
    /// Item type of the value.
    pub item_type: u16,
    /// Number of items.
    pub num_items: u16,
    /// Per-entry status.
    pub return_code: ReturnCode,
    /// Value storage. Non-null handles are allocated by the source and
    /// must be freed by the application.
    pub item: Handle,
}

impl ExtInfoEntry {
    /// An empty request for `info_id`.
    pub const fn request(info_id: ExtInfoId) -> Self {
        Self {
            info_id,
            item_type: 0,
            num_items: 0,
            return_code: ReturnCode::InfoNotSupported,
            item: Handle::NULL,
        }
    }
}

/// Extended image info (`DAT_EXTIMAGEINFO`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtImageInfo {
    /// Requested entries, filled by the source.
    pub entries: Vec<ExtInfoEntry>,
}

impl ExtImageInfo {
    /// A request for the given ids.
    pub fn request(ids: &[ExtInfoId]) -> Self {
        Self {
            entries: ids.iter().copied().map(ExtInfoEntry::request).collect(),
        }
    }

    /// Look up an entry by id.
    pub fn get(&self, id: ExtInfoId) -> Option<&ExtInfoEntry> {
        self.entries.iter().find(|e| e.info_id == id)
    }

    /// Non-null item handles the application must free.
    pub fn owned_handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.entries.iter().map(|e| e.item).filter(|h| !h.is_null())
    }
}

/// Descriptor of the pending audio item (`DAT_AUDIOINFO`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioInfo {
    /// Name of the audio item.
    pub name: String,
    /// Reserved by the protocol.
    pub reserved: u32,
}

/// Rectangle in the source's current units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Frame {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Acquisition area and position in the job (`DAT_IMAGELAYOUT`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageLayout {
    /// Area to acquire.
    pub frame: Frame,
    /// Document number in the job.
    pub document_number: u32,
    /// Page number in the document.
    pub page_number: u32,
    /// Frame number on the page.
    pub frame_number: u32,
}

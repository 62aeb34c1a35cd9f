//! Triplet identity: data group, data argument type and message.

use bitflags::bitflags;
use core::fmt;

bitflags! {
    /// Data group bitmask. Also used for the transfer-group query, which
    /// reports the categories of the pending item.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DataGroups: u32 {
        /// Control operations.
        const CONTROL = 0x0001;
        /// Image data.
        const IMAGE = 0x0002;
        /// Audio data.
        const AUDIO = 0x0004;
    }
}

/// The argument structure a triplet operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum DataArgumentType {
    Null,
    Capability,
    PendingXfers,
    SetupFileXfer,
    SetupMemXfer,
    Status,
    UserInterface,
    XferGroup,
    ExtImageInfo,
    ImageFileXfer,
    ImageInfo,
    ImageLayout,
    ImageMemXfer,
    ImageMemFileXfer,
    ImageNativeXfer,
    AudioFileXfer,
    AudioInfo,
    AudioNativeXfer,
}

/// The operation requested on the argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Message {
    Get,
    GetCurrent,
    GetDefault,
    Set,
    Reset,
    EndXfer,
    DisableDs,
    XferReady,
}

/// One protocol request identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triplet {
    /// The data group. Exactly one bit is set.
    pub group: DataGroups,
    /// The argument structure.
    pub dat: DataArgumentType,
    /// The message.
    pub msg: Message,
}

impl Triplet {
    /// Build a triplet.
    pub const fn new(group: DataGroups, dat: DataArgumentType, msg: Message) -> Self {
        Self { group, dat, msg }
    }

    /// A control-group triplet.
    pub const fn control(dat: DataArgumentType, msg: Message) -> Self {
        Self::new(DataGroups::CONTROL, dat, msg)
    }

    /// An image-group triplet.
    pub const fn image(dat: DataArgumentType, msg: Message) -> Self {
        Self::new(DataGroups::IMAGE, dat, msg)
    }

    /// An audio-group triplet.
    pub const fn audio(dat: DataArgumentType, msg: Message) -> Self {
        Self::new(DataGroups::AUDIO, dat, msg)
    }
}

impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = if self.group == DataGroups::CONTROL {
            "Control"
        } else if self.group == DataGroups::IMAGE {
            "Image"
        } else if self.group == DataGroups::AUDIO {
            "Audio"
        } else {
            "Mixed"
        };
        write!(f, "{}/{:?}/{:?}", group, self.dat, self.msg)
    }
}

//! The device protocol boundary.

use crate::{
    AudioInfo, CapabilityId, DataGroups, ExtImageInfo, Handle, ImageInfo, ImageLayout,
    ImageMemXfer, Message, PendingXfers, ReturnCode, SetupFileXfer, SetupMemXfer, Status,
};

/// One opened data source, seen through the requests a transfer window issues.
///
/// Each method is one protocol triplet. Records are passed the way the native
/// entry point takes them: the caller owns the record and the source fills it
/// in. The returned code is the only success signal; record contents are
/// unspecified when the code is not `Success` (or `XferDone` for transfers).
///
/// Implementations do not validate protocol state. Callers are expected to go
/// through a state-checking session wrapper.
pub trait DataSource {
    /// `DG_CONTROL / DAT_PENDINGXFERS / MSG_GET`
    fn get_pending_xfers(&mut self, pending: &mut PendingXfers) -> ReturnCode;

    /// `DG_CONTROL / DAT_PENDINGXFERS / MSG_ENDXFER`: finalize the current item.
    fn end_xfer(&mut self, pending: &mut PendingXfers) -> ReturnCode;

    /// `DG_CONTROL / DAT_PENDINGXFERS / MSG_RESET`: drop every pending item.
    fn reset_pending_xfers(&mut self, pending: &mut PendingXfers) -> ReturnCode;

    /// `DG_CONTROL / DAT_SETUPMEMXFER / MSG_GET`
    fn get_setup_mem_xfer(&mut self, setup: &mut SetupMemXfer) -> ReturnCode;

    /// `DG_CONTROL / DAT_SETUPFILEXFER / MSG_GET`
    fn get_setup_file_xfer(&mut self, setup: &mut SetupFileXfer) -> ReturnCode;

    /// `DG_CONTROL / DAT_XFERGROUP / MSG_GET`: categories of the pending item.
    fn get_xfer_group(&mut self, groups: &mut DataGroups) -> ReturnCode;

    /// `DG_CONTROL / DAT_CAPABILITY / MSG_GETCURRENT` for a one-value capability.
    fn get_current_capability(&mut self, cap: CapabilityId, value: &mut u16) -> ReturnCode;

    /// Whether the source reported `cap` as supported during negotiation.
    fn supports_capability(&self, cap: CapabilityId) -> bool;

    /// `DG_CONTROL / DAT_STATUS / MSG_GET`
    fn get_status(&mut self, status: &mut Status) -> ReturnCode;

    /// `DG_CONTROL / DAT_USERINTERFACE / MSG_DISABLEDS`
    fn disable(&mut self) -> ReturnCode;

    /// `DG_IMAGE / DAT_IMAGEINFO / MSG_GET`
    fn get_image_info(&mut self, info: &mut ImageInfo) -> ReturnCode;

    /// `DG_IMAGE / DAT_EXTIMAGEINFO / MSG_GET`. Entries arrive pre-populated
    /// with the requested ids.
    fn get_ext_image_info(&mut self, info: &mut ExtImageInfo) -> ReturnCode;

    /// `DG_IMAGE / DAT_IMAGELAYOUT / msg` for `Get`, `GetDefault`, `Reset` and `Set`.
    fn image_layout(&mut self, msg: Message, layout: &mut ImageLayout) -> ReturnCode;

    /// `DG_IMAGE / DAT_IMAGENATIVEXFER / MSG_GET`. On `XferDone` the source
    /// stores a handle it allocated into `handle`.
    fn image_native_xfer(&mut self, handle: &mut Handle) -> ReturnCode;

    /// `DG_IMAGE / DAT_IMAGEFILEXFER / MSG_GET`
    fn image_file_xfer(&mut self) -> ReturnCode;

    /// `DG_IMAGE / DAT_IMAGEMEMXFER / MSG_GET`: fill the next chunk.
    fn image_mem_xfer(&mut self, xfer: &mut ImageMemXfer) -> ReturnCode;

    /// `DG_IMAGE / DAT_IMAGEMEMFILEXFER / MSG_GET`: fill the next file chunk.
    fn image_mem_file_xfer(&mut self, xfer: &mut ImageMemXfer) -> ReturnCode;

    /// `DG_AUDIO / DAT_AUDIOINFO / MSG_GET`
    fn get_audio_info(&mut self, info: &mut AudioInfo) -> ReturnCode;

    /// `DG_AUDIO / DAT_AUDIONATIVEXFER / MSG_GET`
    fn audio_native_xfer(&mut self, handle: &mut Handle) -> ReturnCode;

    /// `DG_AUDIO / DAT_AUDIOFILEXFER / MSG_GET`
    fn audio_file_xfer(&mut self) -> ReturnCode;
}

//! Image-group requests.

use super::{Session, READY_ONLY, READY_TO_XFER, SOURCE_OPEN_TO_READY};
use crate::domain::error::StateError;
use core::ops::RangeInclusive;
use twain_protocol::{
    DataArgumentType, DataGroups, DataSource, ExtImageInfo, Handle, ImageInfo, ImageLayout, ImageMemXfer,
    Message, ReturnCode, State, Triplet,
};

const XFER_ONLY: RangeInclusive<State> = State::Transferring..=State::Transferring;
const SOURCE_OPEN_ONLY: RangeInclusive<State> = State::SourceOpened..=State::SourceOpened;

impl<S: DataSource> Session<S> {
    /// Read the descriptor of the pending or just-transferred image.
    pub fn image_info(&mut self, info: &mut ImageInfo) -> Result<ReturnCode, StateError> {
        self.verify(READY_TO_XFER, Triplet::image(DataArgumentType::ImageInfo, Message::Get))?;
        Ok(self.source.get_image_info(info))
    }

    /// Read extended image info. Only legal while transferring.
    pub fn ext_image_info(&mut self, info: &mut ExtImageInfo) -> Result<ReturnCode, StateError> {
        self.verify(XFER_ONLY, Triplet::image(DataArgumentType::ExtImageInfo, Message::Get))?;
        Ok(self.source.get_ext_image_info(info))
    }

    /// Read the current acquisition area.
    pub fn image_layout(&mut self, layout: &mut ImageLayout) -> Result<ReturnCode, StateError> {
        self.layout_request(SOURCE_OPEN_TO_READY, Message::Get, layout)
    }

    /// Read the source's default acquisition area.
    pub fn image_layout_default(
        &mut self,
        layout: &mut ImageLayout,
    ) -> Result<ReturnCode, StateError> {
        self.layout_request(SOURCE_OPEN_TO_READY, Message::GetDefault, layout)
    }

    /// Reset the acquisition area to its default. `layout` receives it.
    pub fn reset_image_layout(
        &mut self,
        layout: &mut ImageLayout,
    ) -> Result<ReturnCode, StateError> {
        self.layout_request(SOURCE_OPEN_ONLY, Message::Reset, layout)
    }

    /// Set the acquisition area. The source may adjust `layout`.
    pub fn set_image_layout(&mut self, layout: &mut ImageLayout) -> Result<ReturnCode, StateError> {
        self.layout_request(SOURCE_OPEN_ONLY, Message::Set, layout)
    }

    fn layout_request(
        &mut self,
        allowed: RangeInclusive<State>,
        msg: Message,
        layout: &mut ImageLayout,
    ) -> Result<ReturnCode, StateError> {
        self.verify(allowed, Triplet::image(DataArgumentType::ImageLayout, msg))?;
        Ok(self.source.image_layout(msg, layout))
    }

    /// Request the image as one native handle.
    pub fn image_native_xfer(&mut self, handle: &mut Handle) -> Result<ReturnCode, StateError> {
        self.verify(READY_ONLY, Triplet::image(DataArgumentType::ImageNativeXfer, Message::Get))?;
        Ok(self.source.image_native_xfer(handle))
    }

    /// Ask the source to write the image to the configured file.
    pub fn image_file_xfer(&mut self) -> Result<ReturnCode, StateError> {
        self.verify(READY_ONLY, Triplet::image(DataArgumentType::ImageFileXfer, Message::Get))?;
        Ok(self.source.image_file_xfer())
    }

    /// Request the next memory chunk.
    pub fn image_mem_xfer(&mut self, xfer: &mut ImageMemXfer) -> Result<ReturnCode, StateError> {
        self.verify(READY_TO_XFER, Triplet::image(DataArgumentType::ImageMemXfer, Message::Get))?;
        Ok(self.source.image_mem_xfer(xfer))
    }

    /// Request the next memory-file chunk.
    pub fn image_mem_file_xfer(
        &mut self,
        xfer: &mut ImageMemXfer,
    ) -> Result<ReturnCode, StateError> {
        self.verify(
            READY_TO_XFER,
            Triplet::image(DataArgumentType::ImageMemFileXfer, Message::Get),
        )?;
        Ok(self.source.image_mem_file_xfer(xfer))
    }

    /// Image descriptor, or `None` when the source has none to give.
    pub(crate) fn fetch_image_info(&mut self) -> Result<Option<ImageInfo>, StateError> {
        if !self.groups.contains(DataGroups::IMAGE) {
            return Ok(None);
        }
        let mut info = ImageInfo::default();
        let rc = self.image_info(&mut info)?;
        Ok(rc.is_success().then_some(info))
    }
}

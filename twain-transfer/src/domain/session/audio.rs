//! Audio-group requests.

use super::{Session, READY_ONLY, READY_TO_XFER};
use crate::domain::error::StateError;
use twain_protocol::{
    AudioInfo, DataArgumentType, DataGroups, DataSource, Handle, Message, ReturnCode, Triplet,
};

impl<S: DataSource> Session<S> {
    /// Read the descriptor of the pending audio item.
    pub fn audio_info(&mut self, info: &mut AudioInfo) -> Result<ReturnCode, StateError> {
        self.verify(READY_TO_XFER, Triplet::audio(DataArgumentType::AudioInfo, Message::Get))?;
        Ok(self.source.get_audio_info(info))
    }

    /// Request the audio item as one native handle.
    pub fn audio_native_xfer(&mut self, handle: &mut Handle) -> Result<ReturnCode, StateError> {
        self.verify(READY_ONLY, Triplet::audio(DataArgumentType::AudioNativeXfer, Message::Get))?;
        Ok(self.source.audio_native_xfer(handle))
    }

    /// Ask the source to write the audio item to the configured file.
    pub fn audio_file_xfer(&mut self) -> Result<ReturnCode, StateError> {
        self.verify(READY_ONLY, Triplet::audio(DataArgumentType::AudioFileXfer, Message::Get))?;
        Ok(self.source.audio_file_xfer())
    }

    /// Audio descriptor, or `None` when the source has none to give.
    pub(crate) fn fetch_audio_info(&mut self) -> Result<Option<AudioInfo>, StateError> {
        if !self.groups.contains(DataGroups::AUDIO) {
            return Ok(None);
        }
        let mut info = AudioInfo::default();
        let rc = self.audio_info(&mut info)?;
        Ok(rc.is_success().then_some(info))
    }
}

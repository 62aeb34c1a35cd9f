//! Completion routine shared by every executor.

use super::XferContext;
use crate::domain::error::StateError;
use crate::domain::ports::{DataTransferred, FileStore, Payload, TransferSink};
use core::ops::Deref;
use log::{debug, trace};
use twain_protocol::{
    CapabilityId, DataGroups, DataSource, ExtImageInfo, MemoryManager, ReturnCode,
};

/// Extended image info whose item handles are freed on drop.
struct ExtInfoGuard<'m, M: MemoryManager> {
    info: ExtImageInfo,
    memory: &'m M,
}

impl<M: MemoryManager> Deref for ExtInfoGuard<'_, M> {
    type Target = ExtImageInfo;

    fn deref(&self) -> &ExtImageInfo {
        &self.info
    }
}

impl<M: MemoryManager> Drop for ExtInfoGuard<'_, M> {
    fn drop(&mut self) {
        for handle in self.info.owned_handles() {
            trace!("freeing ext info item {}", handle);
            self.memory.free(handle);
        }
    }
}

impl<'c, S, M, F, K> XferContext<'c, S, M, F, K>
where
    S: DataSource,
    M: MemoryManager,
    F: FileStore,
    K: TransferSink,
{
    /// Fetch the item's descriptors and hand the payload to the sink.
    ///
    /// Runs in state 7. Descriptor requests that the source cannot answer
    /// leave the matching field `None`.
    pub(super) fn deliver(
        &mut self,
        group: DataGroups,
        payload: Payload<'_>,
    ) -> Result<(), StateError> {
        if group == DataGroups::AUDIO {
            let audio_info = self.session.fetch_audio_info()?;
            self.sink.data_transferred(DataTransferred {
                group,
                payload,
                image_info: None,
                ext_image_info: None,
                audio_info,
            });
            return Ok(());
        }

        let ext = self.ext_image_info()?;
        let image_info = self.session.fetch_image_info()?;
        debug!("delivering image item");
        self.sink.data_transferred(DataTransferred {
            group,
            payload,
            image_info,
            ext_image_info: ext.as_deref(),
            audio_info: None,
        });
        Ok(())
    }

    fn ext_image_info(&mut self) -> Result<Option<ExtInfoGuard<'c, M>>, StateError> {
        let config = self.config;
        let ids = config.ext_info_ids();
        if ids.is_empty() || !self.session.supports_capability(CapabilityId::ExtImageInfo) {
            return Ok(None);
        }
        let mut guard = ExtInfoGuard {
            info: ExtImageInfo::request(ids),
            memory: self.memory,
        };
        match self.session.ext_image_info(&mut guard.info)? {
            ReturnCode::Success => Ok(Some(guard)),
            rc => {
                debug!("extended image info unavailable: {}", rc);
                Ok(None)
            }
        }
    }
}

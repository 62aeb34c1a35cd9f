//! TempFile entity - a temp file that is deleted unless it is persisted.

use crate::domain::ports::FileStore;
use log::{trace, warn};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A temp file created through a [`FileStore`].
///
/// Dropping the guard closes the writer and deletes the file, unless
/// [`persist`](Self::persist) moved it to its final name first.
pub struct TempFile<'f, F: FileStore> {
    store: &'f F,
    path: PathBuf,
    writer: Option<F::Writer>,
    persisted: bool,
}

impl<'f, F: FileStore> TempFile<'f, F> {
    /// Create an empty temp file.
    pub fn create(store: &'f F) -> io::Result<Self> {
        let (path, writer) = store.create_temp()?;
        trace!("created temp file {}", path.display());
        Ok(Self {
            store,
            path,
            writer: Some(writer),
            persisted: false,
        })
    }

    /// Where the file currently lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the writer. Further writes fail.
    pub fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Close the file and rename it to `to`.
    ///
    /// On failure the guard is dropped and the temp file deleted.
    pub fn persist(mut self, to: &Path) -> io::Result<PathBuf> {
        self.close()?;
        self.store.rename(&self.path, to)?;
        self.persisted = true;
        trace!("moved {} to {}", self.path.display(), to.display());
        Ok(to.to_path_buf())
    }
}

impl<F: FileStore> Write for TempFile<'_, F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(io::Error::other("temp file already closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl<F: FileStore> Drop for TempFile<'_, F> {
    fn drop(&mut self) {
        // The writer must be closed before the delete on some platforms
        drop(self.writer.take());
        if self.persisted || !self.store.exists(&self.path) {
            return;
        }
        match self.store.remove(&self.path) {
            Ok(()) => trace!("removed temp file {}", self.path.display()),
            Err(e) => warn!("failed to remove temp file {}: {}", self.path.display(), e),
        }
    }
}

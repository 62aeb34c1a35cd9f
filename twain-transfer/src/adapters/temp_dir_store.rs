//! Directory-backed file store.

use crate::domain::ports::FileStore;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

const DEFAULT_PREFIX: &str = "xfer-";

/// [`FileStore`] creating temp files in one directory.
///
/// Temp files are created with `tempfile` so names never collide, then
/// detached from its auto-delete: their lifetime is owned by
/// [`TempFile`](crate::TempFile).
#[derive(Debug, Clone)]
pub struct TempDirFileStore {
    dir: PathBuf,
    prefix: String,
}

impl TempDirFileStore {
    /// Store temp files in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Store temp files in the system temp directory.
    pub fn system() -> Self {
        Self::new(std::env::temp_dir())
    }

    /// Use a different file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The directory temp files are created in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileStore for TempDirFileStore {
    type Writer = BufWriter<File>;

    fn create_temp(&self) -> io::Result<(PathBuf, Self::Writer)> {
        let file = tempfile::Builder::new()
            .prefix(&self.prefix)
            .suffix(".tmp")
            .tempfile_in(&self.dir)?;
        let (file, path) = file.keep().map_err(|e| e.error)?;
        Ok((path, BufWriter::new(file)))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

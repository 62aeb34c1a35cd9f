//! FileStore port - filesystem operations for chunk-to-file transfers.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Filesystem operations the memory-file mechanism needs.
///
/// Implementations must make `rename` atomic with respect to crashes: after a
/// crash at most one of source and destination holds the data in final form.
/// On one filesystem `std::fs::rename` gives that guarantee.
pub trait FileStore {
    /// Writer over a freshly created temp file.
    type Writer: Write;

    /// Create a new, empty temp file and open it for writing.
    fn create_temp(&self) -> io::Result<(PathBuf, Self::Writer)>;

    /// Move `from` to `to`.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Delete a file.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

impl<F: FileStore + ?Sized> FileStore for &F {
    type Writer = F::Writer;

    fn create_temp(&self) -> io::Result<(PathBuf, Self::Writer)> {
        (**self).create_temp()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        (**self).remove(path)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

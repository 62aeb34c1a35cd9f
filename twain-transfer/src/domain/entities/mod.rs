//! Domain entities for the transfer system.
//!
//! Entities here own a resource with a lifecycle: a memory block, a lock on
//! one, or a temp file. Each releases its resource when dropped, so every
//! exit path out of a mechanism cleans up.

mod native_buffer;
mod temp_file;

pub use native_buffer::{LockedBuffer, NativeBuffer};
pub use temp_file::TempFile;

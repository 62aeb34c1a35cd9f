//! Data source protocol boundary.
//!
//! This crate describes the native, state-based acquisition protocol as plain
//! Rust types: return codes, protocol states, triplet identities and the
//! fixed-layout records exchanged with a data source. It also defines the two
//! traits a transfer core talks through:
//!
//! - [`DataSource`]: one method per protocol request the transfer window uses
//! - [`MemoryManager`]: allocate/lock/unlock/free over source-shared memory
//!
//! No transfer logic lives here. See the `twain-transfer` crate for that.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod capability;
mod memory;
mod records;
mod return_code;
mod source;
mod state;
mod triplet;

pub use capability::{CapabilityId, XferMech};
pub use memory::{Address, Handle, MemoryError, MemoryManager};
pub use records::{
    AudioInfo, ExtImageInfo, ExtInfoEntry, ExtInfoId, FileFormat, Frame, ImageInfo, ImageLayout,
    ImageMemXfer, MemoryFlags, MemoryRef, PendingXfers, SetupFileXfer, SetupMemXfer,
    DONT_CARE_32,
};
pub use return_code::{ConditionCode, ReturnCode, Status};
pub use source::DataSource;
pub use state::State;
pub use triplet::{DataArgumentType, DataGroups, Message, Triplet};

//! Multi-item data transfer loop for state-based acquisition devices.
//!
//! Once a session has negotiated capabilities and the source reports data
//! ready (state 6), this crate drives the source through the transfer loop:
//! it asks the consumer whether to take each pending item, runs the
//! mechanism the source negotiated for it, hands completed data (or the
//! failure) to the consumer, and finalizes the item. When the loop ends the
//! session is forced back to state 5 and the source is disabled.
//!
//! # Architecture
//!
//! The crate follows a ports-and-adapters layout:
//!
//! ## Domain Layer (`domain`)
//! - **State guard**: legal-state check run before every protocol request
//! - **Session**: owns the source and protocol state, one method per triplet
//! - **Mechanisms**: native, file, memory and memory-file executors
//! - **Transfer routine**: the outer multi-item loop
//! - **Ports**: `TransferSink` (consumer callbacks), `FileStore` (temp files)
//!
//! ## Adapter Layer (`adapters`)
//! - **`HeapMemory`**: `MemoryManager` over host heap blocks
//! - **`TempDirFileStore`**: `FileStore` over a temp directory
//!
//! The data source and memory boundaries are defined in `twain-protocol`.
//!
//! # Quick Start
//!
//! ```ignore
//! use twain_transfer::{HeapMemory, Session, TempDirFileStore, TransferConfig, TransferRoutine};
//!
//! let mut session = Session::new(source, DataGroups::IMAGE, State::TransferReady);
//! let memory = HeapMemory::new();
//! let files = TempDirFileStore::system();
//! let config = TransferConfig::default();
//!
//! let summary = TransferRoutine::new(&mut session, &memory, &files, &mut sink, &config).run()?;
//! assert_eq!(session.state(), State::SourceEnabled);
//! ```
//!
//! # Resource guarantees
//!
//! Buffers, locks, temp files and protocol state are held by guards, so they
//! are released on every exit path: success, source failure, local I/O
//! failure, state errors and unwinding.

#![warn(missing_docs)]

pub mod adapters;
pub mod domain;

pub use domain::{
    DataTransferred, FileStore, ItemOutcome, LockedBuffer, NativeBuffer, NativeData, Payload,
    ReadyDecision, Session, StateError, StateGuard, TempFile, TransferConfig, TransferConfigError,
    TransferError, TransferReady, TransferRoutine, TransferSink, TransferSummary,
    DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE,
};

pub use adapters::{HeapMemory, TempDirFileStore};

// Re-export the protocol crate so users can depend on this crate alone
pub use twain_protocol;

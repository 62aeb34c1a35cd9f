//! Ports define the interfaces between the transfer domain and the host.
//!
//! - **`TransferSink`**: the consumer. Primary port: the host drives the
//!   decisions, the domain reports results.
//! - **`FileStore`**: temp-file creation, rename and deletion for the
//!   memory-file mechanism. Secondary port.
//!
//! The data source and memory manager ports are defined by `twain-protocol`.

mod file_store;
mod transfer_sink;

pub use file_store::FileStore;
pub use transfer_sink::{
    DataTransferred, NativeData, Payload, ReadyDecision, TransferReady, TransferSink,
};

//! Domain layer - transfer rules with no infrastructure dependencies.
//!
//! The domain layer contains:
//! - **State guard**: which requests are legal in which protocol state
//! - **Session**: the state-checked request surface over a `DataSource`
//! - **Entities**: resource guards (`NativeBuffer`, `LockedBuffer`, `TempFile`)
//! - **Value Objects**: `TransferConfig`, `ItemOutcome`, `TransferSummary`
//! - **Mechanisms**: one executor per transfer mechanism
//! - **Transfer routine**: the outer multi-item loop
//! - **Ports**: `TransferSink` and `FileStore`
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │       TransferRoutine            │
//!     │  ready → dispatch → end xfer     │
//!     └──────────────┬───────────────────┘
//!                    │ per item, per category
//!                    ▼
//!     ┌──────────────────────────────────┐
//!     │   Mechanisms (XferContext)       │
//!     │  Native | File | Memory | MemFile│
//!     └───────┬──────────────┬───────────┘
//!             │              │
//!             ▼              ▼
//!     ┌──────────────┐ ┌─────────────────┐
//!     │ Session      │ │ NativeBuffer    │
//!     │ + StateGuard │ │ TempFile        │
//!     └──────┬───────┘ └───────┬─────────┘
//!            ▼                 ▼
//!       DataSource      MemoryManager / FileStore
//! ```

pub mod entities;
pub mod error;
pub mod ports;
pub mod session;
pub mod value_objects;

mod mechanism;
mod state_guard;
mod transfer_routine;

pub use entities::{LockedBuffer, NativeBuffer, TempFile};
pub use error::{StateError, TransferError};
pub use ports::{
    DataTransferred, FileStore, NativeData, Payload, ReadyDecision, TransferReady, TransferSink,
};
pub use session::Session;
pub use state_guard::StateGuard;
pub use transfer_routine::TransferRoutine;
pub use value_objects::{
    ItemOutcome, TransferConfig, TransferConfigError, TransferSummary, DEFAULT_CHUNK_SIZE,
    MAX_CHUNK_SIZE,
};

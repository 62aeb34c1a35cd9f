//! Adapter layer - concrete implementations of the domain's ports.
//!
//! # Hexagonal Architecture
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer                │
//!     │  - TransferRoutine (service)     │
//!     │  - FileStore (port)              │
//!     │  - MemoryManager (protocol port) │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ implements
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │  ◄── This module
//!     │  - HeapMemory                    │
//!     │  - TempDirFileStore              │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ uses
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │  Host heap / filesystem          │
//!     └──────────────────────────────────┘
//! ```
//!
//! # Available Adapters
//!
//! - **`HeapMemory`**: `MemoryManager` over heap blocks. Suitable for hosts
//!   where source and application share an address space, and for tests.
//! - **`TempDirFileStore`**: `FileStore` over a directory, built on `tempfile`

mod heap_memory;
mod temp_dir_store;

pub use heap_memory::HeapMemory;
pub use temp_dir_store::TempDirFileStore;

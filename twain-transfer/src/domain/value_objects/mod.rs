//! Immutable values used across the transfer domain.

mod outcome;
mod transfer_config;

pub use outcome::{ItemOutcome, TransferSummary};
pub use transfer_config::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, TransferConfig, TransferConfigError};

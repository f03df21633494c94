//! Error types for solo ordering

use thiserror::Error;

/// Why a chain refused a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The ordering queue is full; the client should retry later
    #[error("channel {0} is overloaded, try again later")]
    Backpressure(String),

    /// The chain was halted and accepts nothing more
    #[error("channel {0} is halted")]
    Halted(String),
}

//! Error types for broadcast ingestion
//!
//! Two families that never mix:
//!
//! - [`BroadcastError`]: business failures of one submission. Always converted into
//!   a single response; never ends a stream.
//! - [`StreamError`]: transport failures. Always end the stream.

use qc_msgprocessor::MsgProcessorError;
use thiserror::Error;

/// Why a single submission was refused.
///
/// The display form is the inner text verbatim; it becomes the response's `info`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    /// The target channel is not served by this node
    #[error("{0}")]
    ChannelDoesNotExist(String),

    /// Malformed input or a policy violation
    #[error("{0}")]
    ValidationFailed(String),

    /// The ordering backend would not take the message (backpressure, shutdown)
    #[error("{0}")]
    SubmissionRejected(String),
}

impl BroadcastError {
    pub fn channel_does_not_exist(msg: impl Into<String>) -> Self {
        Self::ChannelDoesNotExist(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    pub fn submission(msg: impl Into<String>) -> Self {
        Self::SubmissionRejected(msg.into())
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChannelDoesNotExist(_) => "channel_does_not_exist",
            Self::ValidationFailed(_) => "validation_failed",
            Self::SubmissionRejected(_) => "submission_rejected",
        }
    }
}

impl From<MsgProcessorError> for BroadcastError {
    fn from(err: MsgProcessorError) -> Self {
        match err {
            MsgProcessorError::ChannelDoesNotExist(_) => Self::ChannelDoesNotExist(err.to_string()),
            other => Self::ValidationFailed(other.to_string()),
        }
    }
}

/// Transport failure on a broadcast stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The stream ended in the middle of a message
    #[error("unexpected EOF")]
    UnexpectedEof,

    /// The peer is gone; nothing more can be sent
    #[error("stream closed")]
    Closed,

    /// Any other transport fault
    #[error("transport error: {0}")]
    Transport(String),
}

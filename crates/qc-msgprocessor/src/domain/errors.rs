//! Error types for message processing

use shared_types::{ConfigSeq, EnvelopeError, HeaderType};
use thiserror::Error;

/// All reasons a channel can refuse a submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MsgProcessorError {
    /// The submission targets a channel this node does not serve
    #[error("channel does not exist: {0}")]
    ChannelDoesNotExist(String),

    /// The envelope or one of its nested messages could not be decoded
    #[error(transparent)]
    Malformed(#[from] EnvelopeError),

    /// The envelope carried no payload
    #[error("message was empty")]
    EmptyMessage,

    /// The envelope exceeds the channel's size limit
    #[error("message payload is {size} bytes and exceeds maximum allowed {max} bytes")]
    MessageTooLarge { size: usize, max: usize },

    /// The header names a different channel than the processor serves
    #[error("message is for channel {actual} but was submitted to {expected}")]
    ChannelMismatch { expected: String, actual: String },

    /// The creator is not allowed by the named policy
    #[error("creator '{creator}' does not satisfy the {policy} policy")]
    PermissionDenied {
        creator: String,
        policy: &'static str,
    },

    /// The envelope has a header type the operation does not accept
    #[error("expected message of type {expected}, got {actual}")]
    WrongHeaderType {
        expected: HeaderType,
        actual: HeaderType,
    },

    /// A configuration update was structurally valid but its values are not
    #[error("config update rejected: {0}")]
    ConfigRejected(String),

    /// A computed configuration no longer follows the channel's current sequence
    #[error("config sequence {proposed} does not follow current sequence {current}")]
    StaleConfig {
        proposed: ConfigSeq,
        current: ConfigSeq,
    },
}

//! # Error Types
//!
//! Errors raised while encoding or decoding wire types.

use thiserror::Error;

/// Errors that can occur while handling an [`crate::Envelope`] or its payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The envelope carried no payload bytes at all.
    #[error("envelope has no payload")]
    MissingPayload,

    /// The payload bytes could not be decoded.
    #[error("bad payload: {0}")]
    MalformedPayload(String),

    /// The payload decoded, but a nested message did not.
    #[error("bad {kind}: {reason}")]
    MalformedData { kind: &'static str, reason: String },

    /// The header names no channel.
    #[error("channel header has empty channel id")]
    MissingChannelId,

    /// A value could not be encoded.
    #[error("encoding failed: {0}")]
    Encode(String),
}

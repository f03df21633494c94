//! # Channel Configuration Messages
//!
//! A configuration change travels in two shapes:
//!
//! 1. The client submits a `ConfigUpdate` envelope whose payload data is a
//!    [`ConfigUpdateEnvelope`]: the proposed [`ChannelValues`] plus the admins who
//!    endorsed it.
//! 2. The orderer validates it and computes the resulting full [`Config`] at the
//!    next sequence, wrapped with the original update in a [`ConfigEnvelope`]. That
//!    is what actually gets ordered, as the data of a `Config` envelope.

use serde::{Deserialize, Serialize};

use crate::entities::ConfigSeq;
use crate::envelope::Envelope;
use crate::errors::EnvelopeError;

/// Tunable values of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelValues {
    /// Largest envelope (payload + signature) accepted for ordering.
    pub max_message_bytes: usize,
    /// Number of normal messages after which a block is cut.
    pub batch_max_messages: usize,
    /// Creators allowed to submit normal messages. Empty means anyone.
    pub writers: Vec<String>,
    /// Creators allowed to endorse configuration updates.
    pub admins: Vec<String>,
}

impl Default for ChannelValues {
    fn default() -> Self {
        Self {
            max_message_bytes: 1024 * 1024,
            batch_max_messages: 10,
            writers: Vec::new(),
            admins: Vec::new(),
        }
    }
}

/// A proposed change to a channel's values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    /// Channel the update targets.
    pub channel_id: String,
    /// The complete set of values the channel should have afterwards.
    pub values: ChannelValues,
}

/// A [`ConfigUpdate`] together with the identities endorsing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdateEnvelope {
    pub config_update: ConfigUpdate,
    /// Creator names that signed off on the update.
    pub signatures: Vec<String>,
}

impl ConfigUpdateEnvelope {
    pub fn encode(&self) -> Result<Vec<u8>, EnvelopeError> {
        bincode::serialize(self).map_err(|e| EnvelopeError::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        bincode::deserialize(bytes).map_err(|e| EnvelopeError::MalformedData {
            kind: "ConfigUpdateEnvelope",
            reason: e.to_string(),
        })
    }
}

/// A full channel configuration at a given sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub sequence: ConfigSeq,
    pub values: ChannelValues,
}

/// A computed [`Config`] plus the client update it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEnvelope {
    pub config: Config,
    pub last_update: Envelope,
}

impl ConfigEnvelope {
    pub fn encode(&self) -> Result<Vec<u8>, EnvelopeError> {
        bincode::serialize(self).map_err(|e| EnvelopeError::Encode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        bincode::deserialize(bytes).map_err(|e| EnvelopeError::MalformedData {
            kind: "ConfigEnvelope",
            reason: e.to_string(),
        })
    }
}

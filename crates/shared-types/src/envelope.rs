//! # Submission Envelope
//!
//! The unit a client submits over a broadcast stream.
//!
//! ```text
//! Envelope
//! ├── payload:   bincode(Payload)
//! │              ├── header
//! │              │   ├── channel_header   (type, channel_id, tx_id, ...)
//! │              │   └── signature_header (creator, nonce)
//! │              └── data                 (opaque body, e.g. ConfigUpdateEnvelope)
//! └── signature: opaque bytes, checked by the validation layer
//! ```
//!
//! The envelope is never mutated after it is received. Decoding the payload
//! produces a fresh [`Payload`] every time.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::errors::EnvelopeError;

/// Declared type of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderType {
    /// Opaque application message.
    Message,
    /// A fully computed channel configuration.
    Config,
    /// A proposed change to a channel configuration.
    ConfigUpdate,
    /// An endorsed application transaction.
    EndorserTransaction,
    /// A message wrapping another channel's configuration (system use only).
    OrdererTransaction,
    /// A request to read blocks.
    DeliverSeekInfo,
}

impl HeaderType {
    /// Stable lowercase label, used for logging and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderType::Message => "message",
            HeaderType::Config => "config",
            HeaderType::ConfigUpdate => "config_update",
            HeaderType::EndorserTransaction => "endorser_transaction",
            HeaderType::OrdererTransaction => "orderer_transaction",
            HeaderType::DeliverSeekInfo => "deliver_seek_info",
        }
    }
}

impl std::fmt::Display for HeaderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing metadata of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHeader {
    /// Declared message type.
    pub header_type: HeaderType,
    /// Message format version.
    pub version: u32,
    /// Unix timestamp (seconds) at which the client built the message.
    pub timestamp: u64,
    /// Target channel.
    pub channel_id: String,
    /// Transaction identifier, see [`compute_tx_id`].
    pub tx_id: String,
    /// Epoch the message was built for (unused by ordering, carried through).
    pub epoch: u64,
}

/// Identity of the submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SignatureHeader {
    /// Identity name of the creator.
    pub creator: String,
    /// Random nonce, folded into the tx id.
    pub nonce: Vec<u8>,
}

/// Full header of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub channel_header: ChannelHeader,
    pub signature_header: SignatureHeader,
}

/// Decoded contents of an [`Envelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub header: Header,
    pub data: Vec<u8>,
}

impl Payload {
    /// Encodes this payload.
    pub fn encode(&self) -> Result<Vec<u8>, EnvelopeError> {
        bincode::serialize(self).map_err(|e| EnvelopeError::Encode(e.to_string()))
    }
}

/// A client submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Envelope {
    /// Encoded [`Payload`].
    pub payload: Vec<u8>,
    /// Signature over `payload`.
    pub signature: Vec<u8>,
}

impl Envelope {
    /// Wraps an already-built payload.
    pub fn from_payload(payload: &Payload, signature: Vec<u8>) -> Result<Self, EnvelopeError> {
        Ok(Self {
            payload: payload.encode()?,
            signature,
        })
    }

    /// Builds an envelope of the given type for `channel_id`, carrying `data`.
    ///
    /// A fresh nonce and tx id are generated. The signature is left empty; signing
    /// is the client's concern.
    pub fn build(
        header_type: HeaderType,
        channel_id: &str,
        creator: &str,
        data: Vec<u8>,
    ) -> Result<Self, EnvelopeError> {
        let nonce = Uuid::new_v4().as_bytes().to_vec();
        let tx_id = compute_tx_id(&nonce, creator);
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let payload = Payload {
            header: Header {
                channel_header: ChannelHeader {
                    header_type,
                    version: 0,
                    timestamp,
                    channel_id: channel_id.to_string(),
                    tx_id,
                    epoch: 0,
                },
                signature_header: SignatureHeader {
                    creator: creator.to_string(),
                    nonce,
                },
            },
            data,
        };

        Self::from_payload(&payload, Vec::new())
    }

    /// Decodes the payload.
    pub fn payload(&self) -> Result<Payload, EnvelopeError> {
        if self.payload.is_empty() {
            return Err(EnvelopeError::MissingPayload);
        }
        bincode::deserialize(&self.payload)
            .map_err(|e| EnvelopeError::MalformedPayload(e.to_string()))
    }

    /// Decodes the payload and returns its channel header.
    ///
    /// Fails when the payload is malformed or names no channel.
    pub fn channel_header(&self) -> Result<ChannelHeader, EnvelopeError> {
        let chdr = self.payload()?.header.channel_header;
        if chdr.channel_id.is_empty() {
            return Err(EnvelopeError::MissingChannelId);
        }
        Ok(chdr)
    }

    /// Size of the envelope on the wire, in bytes.
    pub fn size(&self) -> usize {
        self.payload.len() + self.signature.len()
    }

    /// True when the envelope carries neither payload nor signature.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty() && self.signature.is_empty()
    }
}

/// Computes a transaction id as `hex(sha256(nonce || creator))`.
pub fn compute_tx_id(nonce: &[u8], creator: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator.as_bytes());
    hex::encode(hasher.finalize())
}

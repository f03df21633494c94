//! # Core Domain Entities
//!
//! Ordered output of a channel and the primitive aliases used around it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::envelope::Envelope;

/// A 32-byte SHA-256 hash.
pub type Hash = [u8; 32];

/// Configuration generation of a channel.
///
/// Starts at 0 and increases by exactly one with every applied configuration.
/// Validation reports the sequence it ran against; submission carries it so the
/// backend can tell whether the channel moved in between.
pub type ConfigSeq = u64;

/// Header of an ordered block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Position in the channel's chain, starting at 0.
    pub number: u64,
    /// Hash of the previous block's header.
    pub previous_hash: Hash,
    /// Hash over the block's envelopes.
    pub data_hash: Hash,
}

impl BlockHeader {
    /// SHA-256 over the header fields.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.number.to_be_bytes());
        hasher.update(self.previous_hash);
        hasher.update(self.data_hash);
        hasher.finalize().into()
    }
}

/// A batch of ordered envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Block {
    pub header: BlockHeader,
    pub envelopes: Vec<Envelope>,
}

impl Block {
    /// Builds block `number` on top of `previous_hash`.
    pub fn new(number: u64, previous_hash: Hash, envelopes: Vec<Envelope>) -> Self {
        let data_hash = Self::compute_data_hash(&envelopes);
        Self {
            header: BlockHeader {
                number,
                previous_hash,
                data_hash,
            },
            envelopes,
        }
    }

    /// SHA-256 over every envelope's payload and signature, in order.
    pub fn compute_data_hash(envelopes: &[Envelope]) -> Hash {
        let mut hasher = Sha256::new();
        for env in envelopes {
            hasher.update((env.payload.len() as u64).to_be_bytes());
            hasher.update(&env.payload);
            hasher.update((env.signature.len() as u64).to_be_bytes());
            hasher.update(&env.signature);
        }
        hasher.finalize().into()
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }
}

//! Block cutting
//!
//! Accumulates normal messages and decides when a batch becomes a block.
//! Time-based cuts are the ordering task's job; the cutter only counts.

use shared_types::Envelope;

/// Pending batch of normal messages.
#[derive(Debug, Default)]
pub struct BlockCutter {
    pending: Vec<Envelope>,
}

impl BlockCutter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `env` to the pending batch.
    ///
    /// Returns the batches that are now complete: empty, or one batch of exactly
    /// `max_messages` envelopes. A limit of zero is treated as one.
    pub fn ordered(&mut self, env: Envelope, max_messages: usize) -> Vec<Vec<Envelope>> {
        self.pending.push(env);
        if self.pending.len() >= max_messages.max(1) {
            vec![self.cut()]
        } else {
            Vec::new()
        }
    }

    /// Takes everything pending, possibly nothing.
    pub fn cut(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

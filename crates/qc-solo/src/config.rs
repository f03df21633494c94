//! Configuration for the solo ordering backend

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Solo ordering configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoloConfig {
    /// Submissions that may wait for the ordering task before `Backpressure`
    pub queue_depth: usize,
    /// Longest a non-empty batch waits before it is cut (milliseconds)
    pub batch_timeout_ms: u64,
    /// Blocks buffered per subscriber before slow subscribers start lagging
    pub block_buffer: usize,
}

impl SoloConfig {
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }
}

impl Default for SoloConfig {
    fn default() -> Self {
        Self {
            queue_depth: 1000,
            batch_timeout_ms: 2000,
            block_buffer: 64,
        }
    }
}

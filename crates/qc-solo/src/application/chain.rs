//! Solo chain
//!
//! [`SoloChain`] is the cheap, cloneable submission side. Each chain owns one
//! ordering task that is the only writer of the channel's blocks and config.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use quantum_telemetry::{SOLO_BLOCKS_CUT, SOLO_MESSAGES_DROPPED};
use shared_types::{Block, ConfigSeq, Envelope, Hash};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::config::SoloConfig;
use crate::domain::block_cutter::BlockCutter;
use crate::domain::errors::ChainError;
use crate::ports::outbound::MessageProcessor;

/// A submission waiting for the ordering task.
#[derive(Debug)]
enum Submission {
    Normal {
        env: Envelope,
        config_seq: ConfigSeq,
    },
    Config {
        config: Envelope,
        config_seq: ConfigSeq,
    },
}

/// Submission handle for one channel.
#[derive(Clone)]
pub struct SoloChain {
    channel_id: String,
    queue: mpsc::Sender<Submission>,
    blocks: broadcast::Sender<Block>,
    halt: Arc<watch::Sender<bool>>,
    halted: Arc<AtomicBool>,
    height: Arc<AtomicU64>,
}

impl SoloChain {
    /// Starts the ordering task for `processor`'s channel.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        processor: Arc<dyn MessageProcessor>,
        config: SoloConfig,
    ) -> (SoloChain, JoinHandle<()>) {
        let (chain, task) = Self::build(processor, config);
        let handle = tokio::spawn(task.run());
        (chain, handle)
    }

    fn build(
        processor: Arc<dyn MessageProcessor>,
        config: SoloConfig,
    ) -> (SoloChain, OrderingTask) {
        let (queue, rx) = mpsc::channel(config.queue_depth.max(1));
        let (blocks, _) = broadcast::channel(config.block_buffer.max(1));
        let (halt, halt_rx) = watch::channel(false);
        let halted = Arc::new(AtomicBool::new(false));
        let height = Arc::new(AtomicU64::new(0));

        let chain = SoloChain {
            channel_id: processor.channel_id().to_string(),
            queue,
            blocks: blocks.clone(),
            halt: Arc::new(halt),
            halted: halted.clone(),
            height: height.clone(),
        };
        let task = OrderingTask {
            processor,
            config,
            rx,
            halt_rx,
            blocks,
            halted,
            height,
            cutter: BlockCutter::new(),
            previous_hash: [0u8; 32],
        };
        (chain, task)
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Enqueues a validated normal message.
    pub fn order(&self, env: Envelope, config_seq: ConfigSeq) -> Result<(), ChainError> {
        self.enqueue(Submission::Normal { env, config_seq })
    }

    /// Enqueues a validated `Config` envelope.
    pub fn configure(&self, config: Envelope, config_seq: ConfigSeq) -> Result<(), ChainError> {
        self.enqueue(Submission::Config { config, config_seq })
    }

    /// Receives every block cut after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Block> {
        self.blocks.subscribe()
    }

    /// Number of blocks cut so far.
    pub fn height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Stops the ordering task. Queued submissions are discarded.
    pub fn halt(&self) {
        if !self.halted.swap(true, Ordering::SeqCst) {
            info!(channel = %self.channel_id, "Halting solo chain");
        }
        self.halt.send_replace(true);
    }

    fn enqueue(&self, submission: Submission) -> Result<(), ChainError> {
        if self.is_halted() {
            return Err(ChainError::Halted(self.channel_id.clone()));
        }
        self.queue.try_send(submission).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                debug!(channel = %self.channel_id, "Ordering queue full");
                ChainError::Backpressure(self.channel_id.clone())
            }
            mpsc::error::TrySendError::Closed(_) => ChainError::Halted(self.channel_id.clone()),
        })
    }
}

impl std::fmt::Debug for SoloChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoloChain")
            .field("channel_id", &self.channel_id)
            .field("height", &self.height())
            .field("halted", &self.is_halted())
            .finish()
    }
}

/// The single writer of a channel's blocks.
struct OrderingTask {
    processor: Arc<dyn MessageProcessor>,
    config: SoloConfig,
    rx: mpsc::Receiver<Submission>,
    halt_rx: watch::Receiver<bool>,
    blocks: broadcast::Sender<Block>,
    halted: Arc<AtomicBool>,
    height: Arc<AtomicU64>,
    cutter: BlockCutter,
    previous_hash: Hash,
}

impl OrderingTask {
    async fn run(mut self) {
        let channel = self.processor.channel_id().to_string();
        info!(channel = %channel, "Solo ordering task started");

        // Set while a non-empty batch is waiting for its timeout
        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                changed = self.halt_rx.changed() => {
                    if changed.is_err() || *self.halt_rx.borrow() {
                        break;
                    }
                }
                submission = self.rx.recv() => {
                    let Some(submission) = submission else { break };
                    match submission {
                        Submission::Normal { env, config_seq } => {
                            self.handle_normal(env, config_seq);
                            deadline = match (self.cutter.is_empty(), deadline) {
                                (true, _) => None,
                                (false, None) => Some(Instant::now() + self.config.batch_timeout()),
                                (false, pending) => pending,
                            };
                        }
                        Submission::Config { config, config_seq } => {
                            self.handle_config(config, config_seq);
                            deadline = None;
                        }
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    let batch = self.cutter.cut();
                    if !batch.is_empty() {
                        debug!(channel = %channel, "Batch timer expired, cutting block");
                        self.write_block(batch);
                    }
                }
            }
        }

        self.halted.store(true, Ordering::SeqCst);
        info!(
            channel = %channel,
            height = self.height.load(Ordering::SeqCst),
            "Solo ordering task stopped"
        );
    }

    fn handle_normal(&mut self, env: Envelope, config_seq: ConfigSeq) {
        if config_seq < self.processor.sequence() {
            if let Err(e) = self.processor.process_normal_msg(&env) {
                warn!(
                    channel = %self.processor.channel_id(),
                    config_seq,
                    error = %e,
                    "Discarding normal message invalidated by config change"
                );
                SOLO_MESSAGES_DROPPED
                    .with_label_values(&[self.processor.channel_id(), "normal"])
                    .inc();
                return;
            }
        }

        let max = self.processor.batch_max_messages();
        for batch in self.cutter.ordered(env, max) {
            self.write_block(batch);
        }
    }

    fn handle_config(&mut self, config: Envelope, config_seq: ConfigSeq) {
        let config = if config_seq < self.processor.sequence() {
            match self.processor.process_config_msg(&config) {
                Ok((config, _)) => config,
                Err(e) => {
                    warn!(
                        channel = %self.processor.channel_id(),
                        config_seq,
                        error = %e,
                        "Discarding config message invalidated by config change"
                    );
                    SOLO_MESSAGES_DROPPED
                        .with_label_values(&[self.processor.channel_id(), "config"])
                        .inc();
                    return;
                }
            }
        } else {
            config
        };

        // Everything ordered before the config goes out under the old config
        let pending = self.cutter.cut();
        if !pending.is_empty() {
            self.write_block(pending);
        }

        match self.processor.apply_config(&config) {
            Ok(sequence) => {
                info!(
                    channel = %self.processor.channel_id(),
                    sequence,
                    "Ordering config block"
                );
                self.write_block(vec![config]);
            }
            Err(e) => {
                warn!(
                    channel = %self.processor.channel_id(),
                    error = %e,
                    "Discarding config message that could not be applied"
                );
                SOLO_MESSAGES_DROPPED
                    .with_label_values(&[self.processor.channel_id(), "config"])
                    .inc();
            }
        }
    }

    fn write_block(&mut self, envelopes: Vec<Envelope>) {
        let number = self.height.load(Ordering::SeqCst);
        let block = Block::new(number, self.previous_hash, envelopes);
        self.previous_hash = block.header.hash();
        self.height.store(number + 1, Ordering::SeqCst);

        debug!(
            channel = %self.processor.channel_id(),
            number,
            messages = block.len(),
            "Cut block"
        );
        SOLO_BLOCKS_CUT
            .with_label_values(&[self.processor.channel_id()])
            .inc();

        // No subscribers is not an error
        let _ = self.blocks.send(block);
    }
}

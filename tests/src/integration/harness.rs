//! Test node fixture
//!
//! One `Registrar` serving the configured channels plus a `BroadcastHandler`
//! routed through it. Every client connection is an in-memory stream served on
//! its own task.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use qc_broadcast::{in_memory_stream, BroadcastHandler, StreamClient, StreamError};
use qc_registrar::{ChainSupport, Registrar, RegistrarConfig, RegistrarError};
use quantum_telemetry::{init_telemetry, TelemetryConfig, TelemetryGuard};
use shared_types::{
    Block, ChannelValues, ConfigUpdate, ConfigUpdateEnvelope, Envelope, EnvelopeError, HeaderType,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Longest a test waits for a block.
pub const BLOCK_WAIT: Duration = Duration::from_secs(5);

static TELEMETRY: OnceLock<Option<TelemetryGuard>> = OnceLock::new();

/// Installs logging and metrics once per test process.
pub fn init_test_telemetry() {
    TELEMETRY.get_or_init(|| {
        let config = TelemetryConfig {
            log_level: "warn".to_string(),
            ..TelemetryConfig::for_orderer("test")
        };
        init_telemetry(&config).ok()
    });
}

/// A running orderer.
pub struct TestNode {
    pub registrar: Arc<Registrar>,
    pub handler: BroadcastHandler<Registrar>,
}

impl TestNode {
    /// Starts every channel in `config`. Must run inside a tokio runtime.
    pub fn start(config: &RegistrarConfig) -> Result<Self, RegistrarError> {
        init_test_telemetry();
        let registrar = Arc::new(Registrar::from_config(config)?);
        let handler = BroadcastHandler::new(registrar.clone());
        Ok(Self { registrar, handler })
    }

    /// Opens a client stream served by the handler.
    pub fn connect(
        &self,
        remote_addr: &str,
    ) -> (StreamClient, JoinHandle<Result<(), StreamError>>) {
        let (stream, client) = in_memory_stream(remote_addr);
        let task = self.handler.spawn(stream);
        (client, task)
    }

    pub fn channel(&self, channel_id: &str) -> Option<Arc<ChainSupport>> {
        self.registrar.channel(channel_id)
    }

    pub fn shutdown(&self) {
        self.registrar.halt_all();
    }
}

/// Channel values with a block size limit and optional writer/admin lists.
pub fn values(batch_max_messages: usize, writers: &[&str], admins: &[&str]) -> ChannelValues {
    ChannelValues {
        batch_max_messages,
        writers: writers.iter().map(|w| w.to_string()).collect(),
        admins: admins.iter().map(|a| a.to_string()).collect(),
        ..Default::default()
    }
}

/// A normal message.
pub fn message(channel_id: &str, creator: &str, data: &[u8]) -> Result<Envelope, EnvelopeError> {
    Envelope::build(HeaderType::Message, channel_id, creator, data.to_vec())
}

/// A config update proposing `values`, submitted by `creator` and endorsed by `signers`.
pub fn config_update(
    channel_id: &str,
    creator: &str,
    signers: &[&str],
    values: ChannelValues,
) -> Result<Envelope, EnvelopeError> {
    let cue = ConfigUpdateEnvelope {
        config_update: ConfigUpdate {
            channel_id: channel_id.to_string(),
            values,
        },
        signatures: signers.iter().map(|s| s.to_string()).collect(),
    };
    Envelope::build(HeaderType::ConfigUpdate, channel_id, creator, cue.encode()?)
}

/// Next block, or `None` if nothing arrives within [`BLOCK_WAIT`].
pub async fn next_block(rx: &mut broadcast::Receiver<Block>) -> Option<Block> {
    timeout(BLOCK_WAIT, rx.recv()).await.ok()?.ok()
}

/// Data carried by each envelope of `block`.
pub fn block_data(block: &Block) -> Vec<Vec<u8>> {
    block
        .envelopes
        .iter()
        .filter_map(|env| env.payload().ok().map(|p| p.data))
        .collect()
}

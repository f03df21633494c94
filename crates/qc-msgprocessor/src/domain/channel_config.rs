//! Channel configuration bundle
//!
//! Holds the live [`Config`] of one channel. Reads are cheap and concurrent;
//! the only writer is the ordering backend applying an ordered config.
//!
//! ## Invariants
//!
//! - The sequence only ever moves from `n` to `n + 1`.
//! - A proposal computed at sequence `n` is only applicable while the channel is
//!   still at `n`.

use parking_lot::RwLock;
use shared_types::{
    ChannelValues, Config, ConfigEnvelope, ConfigSeq, ConfigUpdateEnvelope, Envelope, HeaderType,
};
use tracing::{debug, info};

use super::errors::MsgProcessorError;

/// Live configuration of a single channel.
#[derive(Debug)]
pub struct ChannelConfig {
    channel_id: String,
    state: RwLock<Config>,
}

impl ChannelConfig {
    /// Creates a channel at sequence 0 with the given values.
    pub fn new(channel_id: impl Into<String>, values: ChannelValues) -> Self {
        Self {
            channel_id: channel_id.into(),
            state: RwLock::new(Config {
                sequence: 0,
                values,
            }),
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Current configuration sequence.
    pub fn sequence(&self) -> ConfigSeq {
        self.state.read().sequence
    }

    /// Snapshot of the current values.
    pub fn values(&self) -> ChannelValues {
        self.state.read().values.clone()
    }

    /// Snapshot of the whole current config.
    pub fn current(&self) -> Config {
        self.state.read().clone()
    }

    /// Validates a `ConfigUpdate` envelope and computes the config that would
    /// result from it, at the next sequence.
    ///
    /// Does not change the channel.
    pub fn propose_config_update(
        &self,
        update: &Envelope,
    ) -> Result<ConfigEnvelope, MsgProcessorError> {
        let payload = update.payload()?;
        let chdr = &payload.header.channel_header;
        if chdr.header_type != HeaderType::ConfigUpdate {
            return Err(MsgProcessorError::WrongHeaderType {
                expected: HeaderType::ConfigUpdate,
                actual: chdr.header_type,
            });
        }

        let cue = ConfigUpdateEnvelope::decode(&payload.data)?;
        if cue.config_update.channel_id != self.channel_id {
            return Err(MsgProcessorError::ChannelMismatch {
                expected: self.channel_id.clone(),
                actual: cue.config_update.channel_id,
            });
        }

        let current = self.current();
        Self::check_admins(&current.values, &cue)?;
        Self::check_values(&cue.config_update.values)?;

        debug!(
            channel = %self.channel_id,
            from_sequence = current.sequence,
            "Config update proposal accepted"
        );

        Ok(ConfigEnvelope {
            config: Config {
                sequence: current.sequence + 1,
                values: cue.config_update.values,
            },
            last_update: update.clone(),
        })
    }

    /// Installs an ordered configuration.
    ///
    /// Fails with `StaleConfig` unless `config_env` is exactly one ahead.
    pub fn apply(&self, config_env: &ConfigEnvelope) -> Result<ConfigSeq, MsgProcessorError> {
        let mut state = self.state.write();
        if config_env.config.sequence != state.sequence + 1 {
            return Err(MsgProcessorError::StaleConfig {
                proposed: config_env.config.sequence,
                current: state.sequence,
            });
        }
        *state = config_env.config.clone();

        info!(
            channel = %self.channel_id,
            sequence = state.sequence,
            "Applied channel config"
        );
        Ok(state.sequence)
    }

    /// A channel without admins accepts updates from anyone; otherwise at least
    /// one endorsement must come from a current admin.
    fn check_admins(
        values: &ChannelValues,
        cue: &ConfigUpdateEnvelope,
    ) -> Result<(), MsgProcessorError> {
        if values.admins.is_empty() {
            return Ok(());
        }
        if cue.signatures.iter().any(|s| values.admins.contains(s)) {
            return Ok(());
        }
        Err(MsgProcessorError::PermissionDenied {
            creator: cue.signatures.join(","),
            policy: "Admins",
        })
    }

    fn check_values(values: &ChannelValues) -> Result<(), MsgProcessorError> {
        if values.max_message_bytes == 0 {
            return Err(MsgProcessorError::ConfigRejected(
                "max_message_bytes must be positive".to_string(),
            ));
        }
        if values.batch_max_messages == 0 {
            return Err(MsgProcessorError::ConfigRejected(
                "batch_max_messages must be positive".to_string(),
            ));
        }
        if !values.admins.is_empty() && values.writers.is_empty() {
            // An administered channel must name its writers explicitly
            return Err(MsgProcessorError::ConfigRejected(
                "administered channel must list writers".to_string(),
            ));
        }
        Ok(())
    }
}

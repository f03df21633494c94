//! Standard Channel Processor
//!
//! Validation for an ordinary application channel.

use std::sync::Arc;

use shared_types::{
    ChannelHeader, ConfigEnvelope, ConfigSeq, Envelope, HeaderType,
};
use tracing::debug;

use crate::domain::channel_config::ChannelConfig;
use crate::domain::classification::{classify, Classification};
use crate::domain::errors::MsgProcessorError;
use crate::domain::rules::RuleSet;

/// Message processor for one application channel.
///
/// Stateless apart from the shared [`ChannelConfig`]; safe to call from any
/// number of streams at once.
pub struct StandardChannel {
    config: Arc<ChannelConfig>,
    rules: RuleSet,
    config_rules: RuleSet,
    /// Creator recorded on config envelopes this processor builds.
    orderer_identity: String,
}

impl StandardChannel {
    /// Creates a processor with the standard rule chain.
    pub fn new(config: Arc<ChannelConfig>, orderer_identity: impl Into<String>) -> Self {
        let rules = RuleSet::standard(config.clone());
        Self::with_rules(config, rules, orderer_identity)
    }

    /// Creates a processor with a custom rule chain for client submissions.
    pub fn with_rules(
        config: Arc<ChannelConfig>,
        rules: RuleSet,
        orderer_identity: impl Into<String>,
    ) -> Self {
        Self {
            config_rules: RuleSet::structural(config.clone()),
            config,
            rules,
            orderer_identity: orderer_identity.into(),
        }
    }

    pub fn channel_id(&self) -> &str {
        self.config.channel_id()
    }

    pub fn config(&self) -> &Arc<ChannelConfig> {
        &self.config
    }

    /// Current configuration sequence.
    pub fn sequence(&self) -> ConfigSeq {
        self.config.sequence()
    }

    pub fn classify_msg(&self, chdr: &ChannelHeader) -> Classification {
        classify(chdr)
    }

    /// Validates an ordinary message and returns the sequence it was checked at.
    pub fn process_normal_msg(&self, env: &Envelope) -> Result<ConfigSeq, MsgProcessorError> {
        let seq = self.config.sequence();
        self.rules.apply(env)?;
        Ok(seq)
    }

    /// Validates a config update and computes the resulting `Config` envelope.
    ///
    /// Returns the envelope to order and the sequence read before validation.
    pub fn process_config_update_msg(
        &self,
        env: &Envelope,
    ) -> Result<(Envelope, ConfigSeq), MsgProcessorError> {
        let seq = self.config.sequence();
        self.rules.apply(env)?;

        let config_env = self.config.propose_config_update(env)?;
        let config = Envelope::build(
            HeaderType::Config,
            self.config.channel_id(),
            &self.orderer_identity,
            config_env.encode()?,
        )?;

        // The computed config must itself be orderable
        self.config_rules.apply(&config)?;

        debug!(
            channel = %self.config.channel_id(),
            config_seq = seq,
            next_sequence = config_env.config.sequence,
            "Processed config update"
        );
        Ok((config, seq))
    }

    /// Re-validates a `Config` envelope built at an older sequence by replaying
    /// the update it was computed from.
    pub fn process_config_msg(
        &self,
        env: &Envelope,
    ) -> Result<(Envelope, ConfigSeq), MsgProcessorError> {
        let config_env = Self::decode_config(env)?;
        self.process_config_update_msg(&config_env.last_update)
    }

    /// Applies an ordered `Config` envelope to the channel.
    pub fn apply_config(&self, env: &Envelope) -> Result<ConfigSeq, MsgProcessorError> {
        let config_env = Self::decode_config(env)?;
        self.config.apply(&config_env)
    }

    fn decode_config(env: &Envelope) -> Result<ConfigEnvelope, MsgProcessorError> {
        let payload = env.payload()?;
        let actual = payload.header.channel_header.header_type;
        if actual != HeaderType::Config {
            return Err(MsgProcessorError::WrongHeaderType {
                expected: HeaderType::Config,
                actual,
            });
        }
        Ok(ConfigEnvelope::decode(&payload.data)?)
    }
}

impl std::fmt::Debug for StandardChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardChannel")
            .field("channel_id", &self.config.channel_id())
            .field("rules", &self.rules)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ChannelValues, ConfigUpdate, ConfigUpdateEnvelope};

    fn processor(values: ChannelValues) -> StandardChannel {
        StandardChannel::new(Arc::new(ChannelConfig::new("orders", values)), "orderer0")
    }

    fn config_update(values: ChannelValues) -> Envelope {
        let cue = ConfigUpdateEnvelope {
            config_update: ConfigUpdate {
                channel_id: "orders".to_string(),
                values,
            },
            signatures: vec!["admin".to_string()],
        };
        Envelope::build(HeaderType::ConfigUpdate, "orders", "admin", cue.encode().unwrap())
            .unwrap()
    }

    #[test]
    fn test_normal_msg_returns_current_sequence() {
        let p = processor(ChannelValues::default());
        let env = Envelope::build(HeaderType::Message, "orders", "alice", vec![1]).unwrap();
        assert_eq!(p.process_normal_msg(&env).unwrap(), 0);
    }

    #[test]
    fn test_normal_msg_rejected_by_rules() {
        let p = processor(ChannelValues::default());
        assert_eq!(
            p.process_normal_msg(&Envelope::default()),
            Err(MsgProcessorError::EmptyMessage)
        );
    }

    #[test]
    fn test_config_update_produces_config_envelope() {
        let p = processor(ChannelValues::default());
        let update = config_update(ChannelValues {
            batch_max_messages: 3,
            ..Default::default()
        });

        let (config, seq) = p.process_config_update_msg(&update).unwrap();
        assert_eq!(seq, 0);

        let payload = config.payload().unwrap();
        assert_eq!(payload.header.channel_header.header_type, HeaderType::Config);
        assert_eq!(payload.header.signature_header.creator, "orderer0");

        let config_env = ConfigEnvelope::decode(&payload.data).unwrap();
        assert_eq!(config_env.config.sequence, 1);
        assert_eq!(config_env.config.values.batch_max_messages, 3);
        assert_eq!(config_env.last_update, update);
    }

    #[test]
    fn test_apply_config_then_replay_is_stale() {
        let p = processor(ChannelValues::default());
        let (config, _) = p
            .process_config_update_msg(&config_update(ChannelValues::default()))
            .unwrap();

        assert_eq!(p.apply_config(&config).unwrap(), 1);
        assert_eq!(p.sequence(), 1);
        assert!(matches!(
            p.apply_config(&config),
            Err(MsgProcessorError::StaleConfig { .. })
        ));

        // Replaying the original update yields a config for the new sequence
        let (revalidated, seq) = p.process_config_msg(&config).unwrap();
        assert_eq!(seq, 1);
        assert_eq!(p.apply_config(&revalidated).unwrap(), 2);
    }

    #[test]
    fn test_config_msg_requires_config_type() {
        let p = processor(ChannelValues::default());
        let env = Envelope::build(HeaderType::Message, "orders", "alice", vec![1]).unwrap();
        assert!(matches!(
            p.process_config_msg(&env),
            Err(MsgProcessorError::WrongHeaderType { .. })
        ));
    }

    #[test]
    fn test_classify_msg_delegates() {
        let p = processor(ChannelValues::default());
        let env = config_update(ChannelValues::default());
        let chdr = env.channel_header().unwrap();
        assert_eq!(p.classify_msg(&chdr), Classification::ConfigUpdateMsg);
    }
}

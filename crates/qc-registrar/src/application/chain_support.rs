//! Chain Support
//!
//! Everything one channel needs to accept broadcast submissions: the message
//! processor that validates them and the solo chain that orders them.

use std::sync::Arc;

use async_trait::async_trait;
use qc_broadcast::{BroadcastError, ChannelSupport};
use qc_msgprocessor::{Classification, StandardChannel};
use qc_solo::{ChainError, SoloChain};
use shared_types::{Block, ChannelHeader, ConfigSeq, Envelope};
use tokio::sync::broadcast;

/// One served channel.
#[derive(Debug)]
pub struct ChainSupport {
    processor: Arc<StandardChannel>,
    chain: SoloChain,
}

impl ChainSupport {
    pub fn new(processor: Arc<StandardChannel>, chain: SoloChain) -> Self {
        Self { processor, chain }
    }

    pub fn channel_id(&self) -> &str {
        self.processor.channel_id()
    }

    pub fn processor(&self) -> &Arc<StandardChannel> {
        &self.processor
    }

    pub fn chain(&self) -> &SoloChain {
        &self.chain
    }

    /// Current configuration sequence.
    pub fn sequence(&self) -> ConfigSeq {
        self.processor.sequence()
    }

    pub fn height(&self) -> u64 {
        self.chain.height()
    }

    /// Blocks cut on this channel from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Block> {
        self.chain.subscribe()
    }
}

fn rejected(err: ChainError) -> BroadcastError {
    BroadcastError::SubmissionRejected(err.to_string())
}

#[async_trait]
impl ChannelSupport for ChainSupport {
    fn classify_msg(&self, chdr: &ChannelHeader) -> Result<Classification, BroadcastError> {
        Ok(self.processor.classify_msg(chdr))
    }

    fn process_normal_msg(&self, env: &Envelope) -> Result<ConfigSeq, BroadcastError> {
        Ok(self.processor.process_normal_msg(env)?)
    }

    fn process_config_update_msg(
        &self,
        env: &Envelope,
    ) -> Result<(Envelope, ConfigSeq), BroadcastError> {
        Ok(self.processor.process_config_update_msg(env)?)
    }

    async fn order(&self, env: &Envelope, config_seq: ConfigSeq) -> Result<(), BroadcastError> {
        self.chain.order(env.clone(), config_seq).map_err(rejected)
    }

    async fn configure(
        &self,
        _config_update: &Envelope,
        config: Envelope,
        config_seq: ConfigSeq,
    ) -> Result<(), BroadcastError> {
        self.chain.configure(config, config_seq).map_err(rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_msgprocessor::ChannelConfig;
    use qc_solo::SoloConfig;
    use shared_types::{ChannelValues, HeaderType};

    fn support(values: ChannelValues) -> ChainSupport {
        let processor = Arc::new(StandardChannel::new(
            Arc::new(ChannelConfig::new("orders", values)),
            "orderer0",
        ));
        let (chain, _task) = SoloChain::start(processor.clone(), SoloConfig::default());
        ChainSupport::new(processor, chain)
    }

    #[tokio::test]
    async fn test_processing_errors_become_validation_failures() {
        let support = support(ChannelValues {
            writers: vec!["bob".to_string()],
            ..Default::default()
        });
        let env = Envelope::build(HeaderType::Message, "orders", "alice", b"x".to_vec()).unwrap();

        let err = support.process_normal_msg(&env).unwrap_err();
        assert_eq!(
            err,
            BroadcastError::ValidationFailed(
                "creator 'alice' does not satisfy the Writers policy".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_halted_chain_is_submission_rejected() {
        let support = support(ChannelValues::default());
        support.chain().halt();
        let env = Envelope::build(HeaderType::Message, "orders", "alice", b"x".to_vec()).unwrap();

        let err = support.order(&env, 0).await.unwrap_err();
        assert_eq!(
            err,
            BroadcastError::SubmissionRejected("channel orders is halted".to_string())
        );
    }

    #[tokio::test]
    async fn test_classify_delegates() {
        let support = support(ChannelValues::default());
        let env = Envelope::build(HeaderType::ConfigUpdate, "orders", "a", vec![]).unwrap();
        let chdr = env.channel_header().unwrap();
        assert_eq!(
            support.classify_msg(&chdr).unwrap(),
            Classification::ConfigUpdateMsg
        );
    }
}

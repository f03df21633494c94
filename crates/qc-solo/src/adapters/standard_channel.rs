//! `MessageProcessor` for the standard channel processor.

use qc_msgprocessor::{MsgProcessorError, StandardChannel};
use shared_types::{ConfigSeq, Envelope};

use crate::ports::outbound::MessageProcessor;

impl MessageProcessor for StandardChannel {
    fn channel_id(&self) -> &str {
        StandardChannel::channel_id(self)
    }

    fn sequence(&self) -> ConfigSeq {
        StandardChannel::sequence(self)
    }

    fn batch_max_messages(&self) -> usize {
        self.config().values().batch_max_messages
    }

    fn process_normal_msg(&self, env: &Envelope) -> Result<ConfigSeq, MsgProcessorError> {
        StandardChannel::process_normal_msg(self, env)
    }

    fn process_config_msg(
        &self,
        env: &Envelope,
    ) -> Result<(Envelope, ConfigSeq), MsgProcessorError> {
        StandardChannel::process_config_msg(self, env)
    }

    fn apply_config(&self, env: &Envelope) -> Result<ConfigSeq, MsgProcessorError> {
        StandardChannel::apply_config(self, env)
    }
}

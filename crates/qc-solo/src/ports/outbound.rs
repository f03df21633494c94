//! Outbound Port
//!
//! What the ordering task needs from the channel's message processor to
//! re-validate stale submissions and install configuration changes.

use qc_msgprocessor::MsgProcessorError;
use shared_types::{ConfigSeq, Envelope};

/// Channel-side hooks used while ordering.
pub trait MessageProcessor: Send + Sync {
    fn channel_id(&self) -> &str;

    /// Current configuration sequence.
    fn sequence(&self) -> ConfigSeq;

    /// Current block size limit.
    fn batch_max_messages(&self) -> usize;

    /// Re-checks a normal message against the current configuration.
    fn process_normal_msg(&self, env: &Envelope) -> Result<ConfigSeq, MsgProcessorError>;

    /// Recomputes a `Config` envelope built against an older configuration.
    fn process_config_msg(&self, env: &Envelope)
        -> Result<(Envelope, ConfigSeq), MsgProcessorError>;

    /// Installs an ordered `Config` envelope; returns the new sequence.
    fn apply_config(&self, env: &Envelope) -> Result<ConfigSeq, MsgProcessorError>;
}

//! Validation rules applied to every submission of a channel
//!
//! Rules are evaluated in order and the first failure wins. Limits that are part
//! of the channel configuration (size, writers) are read at evaluation time, so a
//! newly applied config takes effect for the next message.

use std::sync::Arc;

use shared_types::Envelope;
use tracing::debug;

use super::channel_config::ChannelConfig;
use super::errors::MsgProcessorError;

/// A single validation check.
pub trait Rule: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Accepts or rejects the envelope.
    fn apply(&self, env: &Envelope) -> Result<(), MsgProcessorError>;
}

/// Rejects envelopes without a payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRejectRule;

impl Rule for EmptyRejectRule {
    fn name(&self) -> &'static str {
        "empty_reject"
    }

    fn apply(&self, env: &Envelope) -> Result<(), MsgProcessorError> {
        if env.payload.is_empty() {
            return Err(MsgProcessorError::EmptyMessage);
        }
        Ok(())
    }
}

/// Rejects envelopes larger than the channel's `max_message_bytes`.
#[derive(Debug, Clone)]
pub struct SizeFilter {
    config: Arc<ChannelConfig>,
}

impl SizeFilter {
    pub fn new(config: Arc<ChannelConfig>) -> Self {
        Self { config }
    }
}

impl Rule for SizeFilter {
    fn name(&self) -> &'static str {
        "size_filter"
    }

    fn apply(&self, env: &Envelope) -> Result<(), MsgProcessorError> {
        let max = self.config.values().max_message_bytes;
        let size = env.size();
        if size > max {
            return Err(MsgProcessorError::MessageTooLarge { size, max });
        }
        Ok(())
    }
}

/// Rejects envelopes whose header names another channel.
#[derive(Debug, Clone)]
pub struct ChannelMatchRule {
    config: Arc<ChannelConfig>,
}

impl ChannelMatchRule {
    pub fn new(config: Arc<ChannelConfig>) -> Self {
        Self { config }
    }
}

impl Rule for ChannelMatchRule {
    fn name(&self) -> &'static str {
        "channel_match"
    }

    fn apply(&self, env: &Envelope) -> Result<(), MsgProcessorError> {
        let chdr = env.channel_header()?;
        if chdr.channel_id != self.config.channel_id() {
            return Err(MsgProcessorError::ChannelMismatch {
                expected: self.config.channel_id().to_string(),
                actual: chdr.channel_id,
            });
        }
        Ok(())
    }
}

/// Rejects envelopes whose creator is not a channel writer.
///
/// An empty writer list leaves the channel open.
#[derive(Debug, Clone)]
pub struct WritersPolicy {
    config: Arc<ChannelConfig>,
}

impl WritersPolicy {
    pub fn new(config: Arc<ChannelConfig>) -> Self {
        Self { config }
    }
}

impl Rule for WritersPolicy {
    fn name(&self) -> &'static str {
        "writers_policy"
    }

    fn apply(&self, env: &Envelope) -> Result<(), MsgProcessorError> {
        let writers = self.config.values().writers;
        if writers.is_empty() {
            return Ok(());
        }
        let creator = env.payload()?.header.signature_header.creator;
        if !writers.contains(&creator) {
            return Err(MsgProcessorError::PermissionDenied {
                creator,
                policy: "Writers",
            });
        }
        Ok(())
    }
}

/// An ordered list of rules.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule.
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Rules every client submission must pass.
    pub fn standard(config: Arc<ChannelConfig>) -> Self {
        Self::new()
            .with_rule(EmptyRejectRule)
            .with_rule(SizeFilter::new(config.clone()))
            .with_rule(ChannelMatchRule::new(config.clone()))
            .with_rule(WritersPolicy::new(config))
    }

    /// Rules for envelopes the orderer builds itself.
    pub fn structural(config: Arc<ChannelConfig>) -> Self {
        Self::new()
            .with_rule(EmptyRejectRule)
            .with_rule(SizeFilter::new(config))
    }

    /// Applies every rule in order, stopping at the first rejection.
    pub fn apply(&self, env: &Envelope) -> Result<(), MsgProcessorError> {
        for rule in &self.rules {
            if let Err(e) = rule.apply(env) {
                debug!(rule = rule.name(), error = %e, "Message rejected by rule");
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}

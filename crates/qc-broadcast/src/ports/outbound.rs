//! Outbound Ports (Driven Ports / SPI)
//!
//! What the handler needs from the rest of the node: a way to find a channel for
//! a submission, and per channel a way to validate and order it.

use std::sync::Arc;

use async_trait::async_trait;
use qc_msgprocessor::Classification;
use shared_types::{ChannelHeader, ConfigSeq, Envelope};

use crate::domain::errors::BroadcastError;

/// Per-channel validation and ordering.
///
/// Instances are long-lived, shared by every stream that targets the channel,
/// and may be called concurrently. Any serialization needed by `order` or
/// `configure` is the implementation's business.
#[async_trait]
pub trait ChannelSupport: Send + Sync {
    /// Categorizes a header.
    fn classify_msg(&self, chdr: &ChannelHeader) -> Result<Classification, BroadcastError>;

    /// Validates an ordinary message against the current channel configuration.
    ///
    /// Returns the configuration sequence the check ran against.
    fn process_normal_msg(&self, env: &Envelope) -> Result<ConfigSeq, BroadcastError>;

    /// Validates a configuration update and computes the full configuration
    /// envelope it leads to.
    ///
    /// Returns that envelope and the configuration sequence of the computation.
    fn process_config_update_msg(
        &self,
        env: &Envelope,
    ) -> Result<(Envelope, ConfigSeq), BroadcastError>;

    /// Hands a validated ordinary message to the ordering backend.
    async fn order(&self, env: &Envelope, config_seq: ConfigSeq) -> Result<(), BroadcastError>;

    /// Hands a validated configuration change to the ordering backend.
    async fn configure(
        &self,
        config_update: &Envelope,
        config: Envelope,
        config_seq: ConfigSeq,
    ) -> Result<(), BroadcastError>;
}

/// Outcome of routing a submission.
#[derive(Clone)]
pub struct ChannelResolution {
    /// Freshly decoded header of the submission.
    pub header: ChannelHeader,
    /// True when the submission proposes a configuration change.
    pub is_config_update: bool,
    /// The target channel.
    pub support: Arc<dyn ChannelSupport>,
}

impl std::fmt::Debug for ChannelResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelResolution")
            .field("header", &self.header)
            .field("is_config_update", &self.is_config_update)
            .finish_non_exhaustive()
    }
}

/// Routes submissions to channels.
///
/// # Contract
///
/// - Unknown channels fail with `BroadcastError::ChannelDoesNotExist`.
/// - Malformed or unroutable submissions fail with `BroadcastError::ValidationFailed`.
/// - No side effects visible to the handler: resolving the same envelope twice
///   without an intervening channel change gives equivalent results.
pub trait SupportManager: Send + Sync {
    fn broadcast_channel_support(&self, env: &Envelope)
        -> Result<ChannelResolution, BroadcastError>;
}

impl<T: SupportManager + ?Sized> SupportManager for Arc<T> {
    fn broadcast_channel_support(
        &self,
        env: &Envelope,
    ) -> Result<ChannelResolution, BroadcastError> {
        (**self).broadcast_channel_support(env)
    }
}

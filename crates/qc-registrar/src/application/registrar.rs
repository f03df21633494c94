//! Registrar
//!
//! The node's table of channels, and the `SupportManager` the broadcast
//! handler routes through.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use qc_broadcast::{BroadcastError, ChannelResolution, ChannelSupport, SupportManager};
use qc_msgprocessor::{ChannelConfig, Classification, MsgProcessorError, StandardChannel};
use qc_solo::{SoloChain, SoloConfig};
use shared_types::{ChannelValues, Envelope};
use tracing::{debug, info};

use crate::application::chain_support::ChainSupport;
use crate::config::RegistrarConfig;
use crate::domain::errors::RegistrarError;

/// Channel registry.
pub struct Registrar {
    chains: RwLock<HashMap<String, Arc<ChainSupport>>>,
    orderer_identity: String,
    solo: SoloConfig,
}

impl Registrar {
    pub fn new(orderer_identity: impl Into<String>, solo: SoloConfig) -> Self {
        Self {
            chains: RwLock::new(HashMap::new()),
            orderer_identity: orderer_identity.into(),
            solo,
        }
    }

    /// Builds the registry and starts every configured channel.
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_config(config: &RegistrarConfig) -> Result<Self, RegistrarError> {
        let registrar = Self::new(config.orderer_identity.clone(), config.solo.clone());
        for entry in &config.channels {
            registrar.create_channel(&entry.id, entry.values.clone())?;
        }
        info!(
            "[qc-registrar] Serving {} channel(s) as {}",
            config.channels.len(),
            config.orderer_identity
        );
        Ok(registrar)
    }

    /// Starts serving a new channel at config sequence 0.
    pub fn create_channel(
        &self,
        channel_id: &str,
        values: ChannelValues,
    ) -> Result<Arc<ChainSupport>, RegistrarError> {
        if channel_id.is_empty() {
            return Err(RegistrarError::EmptyChannelId);
        }

        let mut chains = self.chains.write();
        if chains.contains_key(channel_id) {
            return Err(RegistrarError::DuplicateChannel(channel_id.to_string()));
        }

        let processor = Arc::new(StandardChannel::new(
            Arc::new(ChannelConfig::new(channel_id, values)),
            self.orderer_identity.clone(),
        ));
        let (chain, _task) = SoloChain::start(processor.clone(), self.solo.clone());
        let support = Arc::new(ChainSupport::new(processor, chain));
        chains.insert(channel_id.to_string(), support.clone());

        info!("[qc-registrar] Created channel {}", channel_id);
        Ok(support)
    }

    pub fn channel(&self, channel_id: &str) -> Option<Arc<ChainSupport>> {
        self.chains.read().get(channel_id).cloned()
    }

    /// Served channel ids, sorted.
    pub fn channel_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.chains.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Halts every channel's ordering task.
    pub fn halt_all(&self) {
        for support in self.chains.read().values() {
            support.chain().halt();
        }
        info!("[qc-registrar] Halted all channels");
    }
}

impl SupportManager for Registrar {
    fn broadcast_channel_support(
        &self,
        env: &Envelope,
    ) -> Result<ChannelResolution, BroadcastError> {
        let header = env.channel_header().map_err(|e| {
            BroadcastError::validation(format!("could not decode channel header: {}", e))
        })?;

        let support = self.channel(&header.channel_id).ok_or_else(|| {
            BroadcastError::from(MsgProcessorError::ChannelDoesNotExist(
                header.channel_id.clone(),
            ))
        })?;

        let is_config_update = match support.classify_msg(&header)? {
            Classification::NormalMsg => false,
            Classification::ConfigUpdateMsg => true,
            Classification::ConfigMsg => {
                return Err(BroadcastError::validation(format!(
                    "message of type {} cannot be processed directly",
                    header.header_type
                )));
            }
        };

        debug!(
            channel = %header.channel_id,
            tx_id = %header.tx_id,
            is_config_update,
            "Resolved broadcast channel"
        );

        Ok(ChannelResolution {
            header,
            is_config_update,
            support,
        })
    }
}

impl std::fmt::Debug for Registrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrar")
            .field("orderer_identity", &self.orderer_identity)
            .field("channels", &self.channel_ids())
            .finish()
    }
}

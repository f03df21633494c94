//! Message classification by header type

use serde::{Deserialize, Serialize};
use shared_types::{ChannelHeader, HeaderType};

/// Processing path a message takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Ordinary transaction: validate, then order.
    NormalMsg,
    /// Client-proposed configuration change: validate, compute full config, then configure.
    ConfigUpdateMsg,
    /// An already computed configuration. Only the orderer itself produces these.
    ConfigMsg,
}

/// Classifies a message by its declared header type.
pub fn classify(chdr: &ChannelHeader) -> Classification {
    match chdr.header_type {
        HeaderType::ConfigUpdate => Classification::ConfigUpdateMsg,
        HeaderType::Config | HeaderType::OrdererTransaction => Classification::ConfigMsg,
        HeaderType::Message
        | HeaderType::EndorserTransaction
        | HeaderType::DeliverSeekInfo => Classification::NormalMsg,
    }
}

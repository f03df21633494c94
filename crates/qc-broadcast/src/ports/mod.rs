//! Ports module for broadcast ingestion
//!
//! Inbound: the transport stream driving the handler.
//! Outbound: channel resolution, validation and ordering.

pub mod inbound;
pub mod outbound;

pub use inbound::BroadcastStream;
pub use outbound::{ChannelResolution, ChannelSupport, SupportManager};

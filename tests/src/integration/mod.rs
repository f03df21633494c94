//! Cross-crate integration flows.

pub mod harness;

mod broadcast_flows;
mod config_flows;

//! Adapters for solo ordering ports.

pub mod standard_channel;

//! Application layer: per-channel support and the registry.

pub mod chain_support;
pub mod registrar;

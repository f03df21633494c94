//! Domain layer for the channel registry.

pub mod errors;

//! Adapters implementing the broadcast ports.

pub mod memory;

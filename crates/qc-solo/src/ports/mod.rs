//! Ports for solo ordering.

pub mod outbound;

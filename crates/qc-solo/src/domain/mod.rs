//! Domain layer for solo ordering.

pub mod block_cutter;
pub mod errors;

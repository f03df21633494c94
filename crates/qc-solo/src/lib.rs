//! # QC-Solo: Single-Node Ordering
//!
//! Totally orders the messages of one channel on one node and cuts them into
//! hash-chained blocks. No replication, no durability.
//!
//! ## Architecture
//!
//! - **Domain**: `BlockCutter` (batching) and `ChainError`
//! - **Ports**: `MessageProcessor`, the re-validation hooks the ordering task needs
//! - **Adapters**: `MessageProcessor` for `qc_msgprocessor::StandardChannel`
//! - **Application**: `SoloChain`, the submission handle, and its ordering task
//!
//! ## Flow
//!
//! ```text
//! order / configure ──try_send──→ [bounded queue] ──→ ordering task
//!                    (full ⇒ Backpressure)                │
//!                                    stale seq? re-validate, drop on failure
//!                                                         │
//!                         normal ─→ BlockCutter ─→ cut at max / timeout ─┐
//!                         config ─→ cut pending, apply, own block ───────┤
//!                                                                        ▼
//!                                                     broadcast::Sender<Block>
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::chain::SoloChain;
pub use config::SoloConfig;
pub use domain::block_cutter::BlockCutter;
pub use domain::errors::ChainError;
pub use ports::outbound::MessageProcessor;

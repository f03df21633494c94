//! # QC-Broadcast: Broadcast Ingestion
//!
//! Accepts client submissions over a long-lived bidirectional stream and answers
//! each one with exactly one status.
//!
//! ## Architecture
//!
//! - **Domain**: error taxonomy and the error → status mapping
//! - **Ports**: `BroadcastStream` (inbound, the transport) and `SupportManager` /
//!   `ChannelSupport` (outbound, routing, validation and ordering)
//! - **Application**: `BroadcastHandler`, the per-stream loop
//! - **Adapters**: an in-memory stream for tests and embedded use
//!
//! ## Stream Lifecycle
//!
//! ```text
//!   ┌──────────── recv ◄───────────────────────────────┐
//!   │               │                                  │
//!   │  EOF ─→ Ok(())│ error ─→ Err (fatal)             │
//!   │               ▼                                  │
//!   │           resolve ─ error ─────────────┐         │
//!   │               ▼                        │         │
//!   │     validate (normal | config) ─ error ┤         │
//!   │               ▼                        │         │
//!   │     submit (order | configure) ─ error ┤         │
//!   │               ▼                        ▼         │
//!   │            SUCCESS                 NOT_FOUND /   │
//!   │               │                  BAD_REQUEST /   │
//!   │               │              SERVICE_UNAVAILABLE │
//!   │               └──────────► send ◄────┘           │
//!   │                              │ ok ───────────────┘
//!   └──────────────────────────────┴ error ─→ Err (fatal)
//! ```
//!
//! Only transport faults end a stream. A rejected submission costs the client
//! one non-SUCCESS response and nothing else.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use adapters::memory::{in_memory_stream, InMemoryStream, StreamClient};
pub use application::handler::BroadcastHandler;
pub use domain::errors::{BroadcastError, StreamError};
pub use domain::status::{status_for, Stage};
pub use ports::inbound::BroadcastStream;
pub use ports::outbound::{ChannelResolution, ChannelSupport, SupportManager};

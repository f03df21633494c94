//! # Quantum-Orderer Test Suite
//!
//! End-to-end flows across the workspace crates: a real `Registrar` with real
//! `StandardChannel` processors and solo chains, driven through the
//! `BroadcastHandler` over in-memory streams.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs          # Node fixture, envelope builders
//!     ├── broadcast_flows.rs  # Submission → response → block
//!     └── config_flows.rs     # Config updates end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//! cargo test -p qc-tests integration::config_flows
//! ```

pub mod integration;

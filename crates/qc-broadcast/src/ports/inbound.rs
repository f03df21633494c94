//! Inbound Port (Driving Port)
//!
//! The transport hands each accepted connection to the handler as a
//! [`BroadcastStream`].

use async_trait::async_trait;
use shared_types::{BroadcastResponse, Envelope};

use crate::domain::errors::StreamError;

/// One client connection.
///
/// Both calls may suspend indefinitely; the handler never times them out.
#[async_trait]
pub trait BroadcastStream: Send {
    /// Waits for the next submission.
    ///
    /// - `Ok(Some(env))`: a submission arrived
    /// - `Ok(None)`: the client closed its sending side (end-of-stream)
    /// - `Err(_)`: the transport failed
    async fn recv(&mut self) -> Result<Option<Envelope>, StreamError>;

    /// Delivers one response.
    async fn send(&mut self, response: BroadcastResponse) -> Result<(), StreamError>;

    /// Peer address, for logging only.
    fn remote_addr(&self) -> String {
        "unknown".to_string()
    }
}

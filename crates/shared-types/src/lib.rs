//! # Shared Types Crate
//!
//! Wire-level types shared by the broadcast handler, the message processors,
//! the ordering backend and the registrar.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary lives here.
//! - **Opaque Envelopes**: an [`Envelope`] carries its payload as encoded bytes; the
//!   header is only decoded by whoever needs it, and decoding never mutates the envelope.
//! - **Fixed Status Vocabulary**: clients only ever see a [`Status`] plus diagnostic text.

pub mod config;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod status;

pub use config::*;
pub use entities::*;
pub use envelope::*;
pub use errors::*;
pub use status::*;

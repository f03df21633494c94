//! Domain module for broadcast ingestion
//!
//! Error taxonomy and status mapping.

pub mod errors;
pub mod status;

pub use errors::*;
pub use status::*;

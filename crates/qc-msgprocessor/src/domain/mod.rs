//! Domain module for message processing
//!
//! Classification, validation rules, channel configuration and errors.

pub mod channel_config;
pub mod classification;
pub mod errors;
pub mod rules;

pub use channel_config::*;
pub use classification::*;
pub use errors::*;
pub use rules::*;

//! # QC-Registrar: Channel Registry
//!
//! Owns every channel this node serves and answers the broadcast handler's one
//! question: which channel does this submission go to?
//!
//! ## Architecture
//!
//! - **Config**: `RegistrarConfig`, loaded from TOML
//! - **Domain**: `RegistrarError`
//! - **Application**: `ChainSupport` (one channel: processor + solo chain,
//!   implements `ChannelSupport`) and `Registrar` (implements `SupportManager`)
//!
//! Channels are created from configuration at startup only. Submissions never
//! create channels.

pub mod application;
pub mod config;
pub mod domain;

pub use application::chain_support::ChainSupport;
pub use application::registrar::Registrar;
pub use config::{ChannelEntry, ConfigError, RegistrarConfig};
pub use domain::errors::RegistrarError;

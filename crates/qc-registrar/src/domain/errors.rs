//! Error types for the channel registry

use thiserror::Error;

use crate::config::ConfigError;

/// Registry construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrarError {
    /// A channel with this id is already registered
    #[error("channel {0} already exists")]
    DuplicateChannel(String),

    /// Channel ids must be non-empty
    #[error("channel id must not be empty")]
    EmptyChannelId,

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

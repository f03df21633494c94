//! Registrar configuration
//!
//! ## Example
//!
//! ```toml
//! orderer_identity = "orderer0"
//!
//! [solo]
//! queue_depth = 1000
//! batch_timeout_ms = 2000
//!
//! [[channels]]
//! id = "orders"
//!
//! [channels.values]
//! max_message_bytes = 1048576
//! batch_max_messages = 10
//! writers = ["alice", "bob"]
//! admins = ["admin"]
//! ```

use std::fs;
use std::path::Path;

use qc_solo::SoloConfig;
use serde::{Deserialize, Serialize};
use shared_types::ChannelValues;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    /// TOML parsing error
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// One channel served by this node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEntry {
    pub id: String,
    #[serde(default)]
    pub values: ChannelValues,
}

/// Registrar configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrarConfig {
    /// Creator recorded on config envelopes this node builds
    pub orderer_identity: String,
    /// Ordering backend settings shared by every channel
    pub solo: SoloConfig,
    /// Channels to serve
    pub channels: Vec<ChannelEntry>,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            orderer_identity: "orderer0".to_string(),
            solo: SoloConfig::default(),
            channels: Vec::new(),
        }
    }
}

impl RegistrarConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Adds a channel entry.
    pub fn with_channel(mut self, id: impl Into<String>, values: ChannelValues) -> Self {
        self.channels.push(ChannelEntry {
            id: id.into(),
            values,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
orderer_identity = "orderer7"

[solo]
batch_timeout_ms = 250

[[channels]]
id = "orders"

[channels.values]
batch_max_messages = 5
writers = ["alice"]

[[channels]]
id = "audit"
"#;

    #[test]
    fn test_parse_sample() {
        let config = RegistrarConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.orderer_identity, "orderer7");
        assert_eq!(config.solo.batch_timeout_ms, 250);
        assert_eq!(config.solo.queue_depth, SoloConfig::default().queue_depth);
        assert_eq!(config.channels.len(), 2);
        assert_eq!(config.channels[0].values.batch_max_messages, 5);
        assert_eq!(config.channels[0].values.writers, vec!["alice".to_string()]);
        assert_eq!(config.channels[1].values, ChannelValues::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(RegistrarConfig::parse("").unwrap(), RegistrarConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = RegistrarConfig::parse("channels = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RegistrarConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("qc-registrar-{}.toml", std::process::id()));
        fs::write(&path, SAMPLE).unwrap();
        let config = RegistrarConfig::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.channels[0].id, "orders");
    }
}

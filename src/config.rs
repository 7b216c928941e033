//! Configuration for gridclc
//!
//! Centralized configuration with sensible defaults. Values can be set through
//! the builder or overridden with `KEY=VALUE` pairs from the command line.

use crate::error::{ClcError, Result};

/// Supported `KEY=VALUE` override keys
pub const CONFIG_KEYS: &[&str] = &[
    "codec.fragment-size",
    "codec.max-frame-size",
    "codec.max-message-size",
    "log.level",
];

/// Accepted values for `log.level`
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Main configuration for a gridclc client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Codec Configuration
    // -------------------------------------------------------------------------
    /// Largest outgoing wire message (in bytes) sent without fragmentation
    pub fragment_size: usize,

    /// Largest single frame accepted off the wire (in bytes)
    pub max_frame_size: usize,

    /// Largest incoming message accepted (in bytes), counted over all of its
    /// frames and, for fragmented messages, over all of its fragments
    pub max_message_size: usize,

    // -------------------------------------------------------------------------
    // Logging Configuration
    // -------------------------------------------------------------------------
    /// Fallback log level when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fragment_size: 4 * 1024 * 1024,     // 4 MB
            max_frame_size: 16 * 1024 * 1024,   // 16 MB
            max_message_size: 64 * 1024 * 1024, // 64 MB
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Apply a single `KEY=VALUE` override
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "codec.fragment-size" => self.fragment_size = parse_size(key, value)?,
            "codec.max-frame-size" => self.max_frame_size = parse_size(key, value)?,
            "codec.max-message-size" => self.max_message_size = parse_size(key, value)?,
            "log.level" => {
                let level = value.to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(ClcError::Config(format!(
                        "invalid log.level '{}' (expected one of: {})",
                        value,
                        LOG_LEVELS.join(" / ")
                    )));
                }
                self.log_level = level;
            }
            _ => {
                return Err(ClcError::Config(format!(
                    "unknown key '{}' (supported: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Apply a `KEY=VALUE` string
    pub fn apply_pair(&mut self, pair: &str) -> Result<()> {
        let (key, value) = split_key_value(pair)
            .ok_or_else(|| ClcError::Config(format!("invalid key=value pair: {}", pair)))?;
        self.apply(key, value)
    }
}

/// Split `KEY=VALUE` at the first `=`; the key must be non-empty
pub fn split_key_value(pair: &str) -> Option<(&str, &str)> {
    let (key, value) = pair.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

fn parse_size(key: &str, value: &str) -> Result<usize> {
    let size: usize = value
        .parse()
        .map_err(|_| ClcError::Config(format!("{} must be a positive integer, got '{}'", key, value)))?;
    if size == 0 {
        return Err(ClcError::Config(format!("{} must be greater than zero", key)));
    }
    Ok(size)
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the fragmentation threshold (in bytes)
    pub fn fragment_size(mut self, size: usize) -> Self {
        self.config.fragment_size = size;
        self
    }

    /// Set the largest accepted incoming frame (in bytes)
    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.config.max_frame_size = size;
        self
    }

    /// Set the largest accepted incoming message (in bytes)
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.config.max_message_size = size;
        self
    }

    /// Set the fallback log level
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

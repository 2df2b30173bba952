//! Layered error definitions
//!
//! Categorized by source: config / protocol / transport / capture / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum RigError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Protocol Errors =====
    /// Frame rejected by the codec (checksum / type / length)
    #[error("protocol error: {message}")]
    Protocol { message: String },

    // ===== Transport Errors =====
    /// Serial session failure that escaped the reconnect policy
    #[error("transport error: {message}")]
    Transport { message: String },

    // ===== Vision Errors =====
    /// Frame source could not produce a frame
    #[error("capture error: {message}")]
    Capture { message: String },

    /// Detector failed to run on a frame
    #[error("detector error: {message}")]
    Detector { message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl RigError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create capture error
    pub fn capture(message: impl Into<String>) -> Self {
        Self::Capture {
            message: message.into(),
        }
    }

    /// Create detector error
    pub fn detector(message: impl Into<String>) -> Self {
        Self::Detector {
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}

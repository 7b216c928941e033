//! Error types for gridclc
//!
//! Provides a unified error type for all codec, transport and CLI operations.
//!
//! Offset/bounds violations on fixed fields are not represented here: they are
//! codec-table bugs and panic at the point of access.

use thiserror::Error;

use crate::protocol::FrameRole;

/// Result type alias using ClcError
pub type Result<T> = std::result::Result<T, ClcError>;

/// Unified error type for gridclc operations
#[derive(Debug, Error)]
pub enum ClcError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Structural Protocol Violations
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unexpected frame at index {index}: expected {expected}, found {found}")]
    UnexpectedFrame {
        index: usize,
        expected: FrameRole,
        found: FrameRole,
    },

    #[error("Message exhausted at frame {index}: expected {expected}")]
    FramesExhausted { index: usize, expected: FrameRole },

    #[error("Message type mismatch: expected 0x{expected:06x}, got 0x{found:06x}")]
    MessageTypeMismatch { expected: i32, found: i32 },

    #[error("Invalid UTF-8 in string frame: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    #[error("Server error {error_code} ({class_name}): {}", .message.as_deref().unwrap_or("<no message>"))]
    Remote {
        error_code: i32,
        class_name: String,
        message: Option<String>,
    },

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClcError {
    /// Whether this error means client and server disagree on the wire format
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            ClcError::Protocol(_)
                | ClcError::UnexpectedFrame { .. }
                | ClcError::FramesExhausted { .. }
                | ClcError::MessageTypeMismatch { .. }
                | ClcError::InvalidUtf8(_)
        )
    }
}

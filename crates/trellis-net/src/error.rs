// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Network layer errors.

use std::time::Duration;

use thiserror::Error;

// =============================================================================
// NetError
// =============================================================================

/// Errors of the framed TCP layer.
#[derive(Debug, Error)]
pub enum NetError {
    /// Underlying socket error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame announced a length above the configured maximum.
    #[error("Frame of {size} bytes exceeds the maximum of {max} bytes")]
    FrameTooLarge {
        /// Announced frame size.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// A frame body failed to decode.
    #[error("Failed to decode frame: {message}")]
    Decode {
        /// Decoder error message.
        message: String,
    },

    /// A message failed to encode.
    #[error("Failed to encode frame: {message}")]
    Encode {
        /// Encoder error message.
        message: String,
    },

    /// The configuration is not usable.
    #[error("Invalid configuration for '{field}': {message}")]
    Config {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The session was idle for longer than the configured timeout.
    #[error("Session idle for longer than {timeout:?}")]
    IdleTimeout {
        /// The configured idle timeout.
        timeout: Duration,
    },
}

impl NetError {
    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors that end a session without being a bug:
    /// idle timeouts and connection resets.
    pub fn is_disconnect(&self) -> bool {
        match self {
            NetError::IdleTimeout { .. } => true,
            NetError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}

/// Result alias for the network layer.
pub type NetResult<T> = Result<T, NetError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = NetError::FrameTooLarge { size: 10, max: 5 };
        assert!(error.to_string().contains("10"));
        assert!(error.to_string().contains("5"));

        let error = NetError::config("bind_address", "not a socket address");
        assert!(error.to_string().contains("bind_address"));
    }

    #[test]
    fn test_is_disconnect() {
        assert!(NetError::IdleTimeout {
            timeout: Duration::from_secs(1)
        }
        .is_disconnect());
        assert!(NetError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe"
        ))
        .is_disconnect());
        assert!(!NetError::decode("bad json").is_disconnect());
    }
}

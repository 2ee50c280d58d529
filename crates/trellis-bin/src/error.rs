// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Binary-level errors.

use std::path::PathBuf;

use thiserror::Error;

use trellis_net::NetError;

// =============================================================================
// BinError
// =============================================================================

/// Errors surfacing from the daemon itself.
#[derive(Debug, Error)]
pub enum BinError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ConfigIo {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file '{path}': {message}")]
    ConfigParse {
        /// Path to the file.
        path: PathBuf,
        /// Parser error message.
        message: String,
    },

    /// The configuration file has an extension the loader does not know.
    #[error("Unsupported config format '{path}': expected .yaml, .yml, or .toml")]
    ConfigFormat {
        /// Path to the file.
        path: PathBuf,
    },

    /// Network layer error.
    #[error("Network error: {0}")]
    Net(#[from] NetError),

    /// The serve task ended abnormally.
    #[error("Runtime error: {message}")]
    Runtime {
        /// What went wrong.
        message: String,
    },
}

impl BinError {
    /// Creates a parse error.
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a runtime error.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }
}

/// Result alias for the daemon.
pub type BinResult<T> = Result<T, BinError>;

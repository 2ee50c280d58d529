// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Network layer configuration.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NetError, NetResult};

// =============================================================================
// NetConfig
// =============================================================================

/// Configuration of the framed TCP listener.
///
/// # Examples
///
/// ```
/// use trellis_net::config::NetConfig;
///
/// let config = NetConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.bind_address, "0.0.0.0:4840");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetConfig {
    /// Socket address the listener binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Maximum frame size in bytes, enforced in both directions.
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: usize,

    /// Maximum number of concurrently served sessions.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// A session is closed after this long without a complete request.
    #[serde(default = "default_idle_timeout")]
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Duration,
}

fn default_bind_address() -> String {
    "0.0.0.0:4840".to_string()
}

fn default_max_frame_size() -> usize {
    1024 * 1024
}

fn default_max_sessions() -> usize {
    64
}

fn default_idle_timeout() -> Duration {
    Duration::from_secs(120)
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            max_frame_size: default_max_frame_size(),
            max_sessions: default_max_sessions(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

impl NetConfig {
    /// Creates a configuration binding to the given address.
    pub fn with_bind_address(address: impl Into<String>) -> Self {
        Self {
            bind_address: address.into(),
            ..Default::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> NetResult<()> {
        self.bind_address.parse::<SocketAddr>().map_err(|e| {
            NetError::config("bind_address", format!("not a socket address: {}", e))
        })?;
        if self.max_frame_size < 256 {
            return Err(NetError::config(
                "max_frame_size",
                "must be at least 256 bytes",
            ));
        }
        if self.max_sessions == 0 {
            return Err(NetError::config("max_sessions", "must be at least 1"));
        }
        if self.idle_timeout.is_zero() {
            return Err(NetError::config("idle_timeout", "must be greater than 0"));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # trellis-bin
//!
//! The `trellisd` daemon: command-line interface, configuration loading,
//! logging initialization, runtime wiring, and graceful shutdown for the
//! Trellis OPC UA server.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

pub use cli::{Cli, Commands};
pub use config::Settings;
pub use error::{BinError, BinResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

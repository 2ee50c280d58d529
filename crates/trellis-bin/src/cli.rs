// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! `trellisd` supports three subcommands:
//!
//! - `run`: start the server (default)
//! - `validate`: parse and validate the configuration file
//! - `version`: show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Trellis - an embeddable OPC UA server.
///
/// Serves a typed, referenced address space over a framed TCP service
/// layer.
#[derive(Parser, Debug)]
#[command(
    name = "trellisd",
    author = "Sylvex <contact@sylvex.io>",
    version = crate::VERSION,
    about = "Trellis OPC UA server daemon",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "trellis.yaml",
        env = "TRELLIS_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "info",
        env = "TRELLIS_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "TRELLIS_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the server
    ///
    /// This is the default command when no subcommand is specified.
    Run(RunArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration without starting the server.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,
}

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Override the bind address from the configuration
    #[arg(short, long, env = "TRELLIS_BIND")]
    pub bind: Option<String>,

    /// Override the application namespace URI
    #[arg(long, env = "TRELLIS_APPLICATION_URI")]
    pub application_uri: Option<String>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Print the parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parses CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the effective command, defaulting to `Run`.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Returns the effective log level based on the quiet/verbose flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::parse_from(["trellisd"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Run(_)));
    }

    #[test]
    fn test_run_with_bind_override() {
        let cli = Cli::parse_from(["trellisd", "run", "--bind", "127.0.0.1:14840"]);
        if let Some(Commands::Run(args)) = cli.command {
            assert_eq!(args.bind.as_deref(), Some("127.0.0.1:14840"));
        } else {
            panic!("expected run command");
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["trellisd", "validate", "--show-config"]);
        if let Some(Commands::Validate(args)) = cli.command {
            assert!(args.show_config);
        } else {
            panic!("expected validate command");
        }
    }

    #[test]
    fn test_log_level_flags() {
        let cli = Cli::parse_from(["trellisd", "-q"]);
        assert_eq!(cli.effective_log_level(), "warn");

        let cli = Cli::parse_from(["trellisd", "-v"]);
        assert_eq!(cli.effective_log_level(), "debug");

        let cli = Cli::parse_from(["trellisd", "-l", "trace"]);
        assert_eq!(cli.effective_log_level(), "trace");
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["trellisd", "-c", "/etc/trellis/server.yaml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/trellis/server.yaml"));
    }
}

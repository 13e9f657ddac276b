// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing.

use std::net::IpAddr;

use clap::{Parser, ValueEnum};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// MERIT - academic achievement tracking backend
///
/// Starts the API server. Token secrets are read from
/// MERIT_ACCESS_SECRET and MERIT_REFRESH_SECRET; without them the
/// server only starts in development mode (`--dev`), which also seeds
/// an in-memory user directory with demo accounts.
#[derive(Parser, Debug)]
#[command(
    name = "merit",
    author = "Sylvex <contact@sylvex.io>",
    version = merit_api::VERSION,
    about = "MERIT academic achievement tracking backend",
    long_about = None
)]
pub struct Cli {
    /// Bind address
    #[arg(long, env = "MERIT_HOST")]
    pub host: Option<IpAddr>,

    /// Bind port
    #[arg(short, long, env = "MERIT_PORT")]
    pub port: Option<u16>,

    /// Development mode (accepts compiled-in secrets, seeds demo
    /// accounts)
    #[arg(long, env = "MERIT_DEV")]
    pub dev: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "MERIT_LOG_LEVEL")]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "MERIT_LOG_FORMAT")]
    pub log_format: LogFormat,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for log aggregation.
    Json,
    /// Minimal compact output.
    Compact,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["merit"]);
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(cli.host.is_none());
    }

    #[test]
    fn test_port_override() {
        let cli = Cli::parse_from(["merit", "--port", "8080"]);
        assert_eq!(cli.port, Some(8080));
    }
}

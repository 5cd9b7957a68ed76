// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `schedbridge`.
///
/// Every flag except `--config`, `--log-level` and `--check` overrides the
/// corresponding value from the config file.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "schedbridge",
    version,
    about = "HTTP bridge between task DAGs and an external list scheduler.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Schedbridge.toml` in the current working directory is
    /// used when it exists; otherwise built-in defaults apply.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP server to.
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port for the HTTP server.
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Directory containing the scheduler sources and executable.
    #[arg(long, value_name = "DIR")]
    pub backend_dir: Option<PathBuf>,

    /// Directory for per-request input/output artifacts.
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Upper bound for one scheduler invocation, in seconds (0 = no bound).
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCHEDBRIDGE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Run the startup checks, print the effective config, and exit.
    #[arg(long)]
    pub check: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

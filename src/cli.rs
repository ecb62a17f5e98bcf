// src/cli.rs

//! CLI argument parsing using `clap` (derive feature).

use clap::{Parser, ValueEnum};

/// Command-line arguments for `devwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devwatch",
    version,
    about = "Restart a development command when watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Devwatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Devwatch.toml")]
    pub config: String,

    /// Watch this directory instead of the configured `[watch].dir`.
    #[arg(long, value_name = "PATH")]
    pub dir: Option<String>,

    /// Additional include pattern (regex, matched anywhere in the path
    /// relative to the watch root). Repeatable.
    #[arg(long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Additional exclude pattern (regex). Repeatable.
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Skip the built-in exclude patterns for generated assets and
    /// compiled templates.
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEVWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the effective watch configuration, but don't start watching.
    #[arg(long)]
    pub dry_run: bool,
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

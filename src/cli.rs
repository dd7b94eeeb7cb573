// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `gulp-targets`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gulp-targets",
    version,
    about = "Discover gulp tasks in a project and expose them as build targets.",
    long_about = None
)]
pub struct CliArgs {
    /// Project directory to scan for a gulpfile.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: String,

    /// Stay alive and re-run discovery whenever the gulpfile changes.
    #[arg(long)]
    pub watch: bool,

    /// Print targets as JSON instead of the human-readable listing.
    #[arg(long)]
    pub json: bool,

    /// Seconds to wait for the extractor process before giving up on it.
    ///
    /// Gulpfiles are arbitrary scripts and may loop forever; after this many
    /// seconds the extractor is killed and discovery degrades to the default
    /// target.
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GULP_TARGETS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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

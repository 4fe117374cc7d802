//! Configuration types and CLI options.
//!
//! This module defines enums used for command-line argument parsing and
//! configuration.

use clap::ValueEnum;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Wire format of one downloaded dataset.
///
/// Fixed for the life of one download request; the destination file's content
/// matches it exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Row-delimited text with a single header line
    Csv,
    /// One top-level JSON array of records
    Json,
}

impl OutputFormat {
    /// File extension the remote resource endpoint is addressed with.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Output rendering requested from the external analytical engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineFormat {
    /// The engine's own interactive table rendering (default)
    Table,
    /// Comma-separated values
    Csv,
    /// JSON records
    Json,
}

impl EngineFormat {
    /// Command-line flag selecting this format, if the engine needs one.
    pub fn engine_flag(self) -> Option<&'static str> {
        match self {
            EngineFormat::Table => None,
            EngineFormat::Csv => Some("-csv"),
            EngineFormat::Json => Some("-json"),
        }
    }
}

//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (page sizes, thresholds, timeouts, etc.)
//! - CLI value enums shared across subcommands

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{EngineFormat, LogFormat, LogLevel, OutputFormat};

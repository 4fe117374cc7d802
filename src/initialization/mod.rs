//! Application initialization and resource setup.
//!
//! Functions to initialize the logger and the shared HTTP client. Everything
//! else in this crate borrows what is built here.

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

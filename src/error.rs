//! Error type definitions.
//!
//! This module defines the typed errors surfaced by the remote client, the
//! downloader, and the external engine wrapper. Orchestration code wraps
//! these in `anyhow` with context; the types here exist so callers (and the
//! retry policy) can match on the failure class.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures while talking to the remote catalog or writing the result.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a usable response (connect failure,
    /// timeout, protocol error).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("remote returned HTTP {status} for {url}: {body}")]
    Status {
        /// HTTP status code of the response.
        status: StatusCode,
        /// URL the request was issued against.
        url: String,
        /// Truncated response body, for diagnostics.
        body: String,
    },

    /// The page body did not parse as the expected format. Treated exactly
    /// like a transport failure: the download aborts, the page is not
    /// committed.
    #[error("malformed page body: {0}")]
    MalformedPage(String),

    /// A URL could not be constructed from the configured base.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Writing to the destination file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Whether retrying the same page fetch might succeed.
    ///
    /// Timeouts, connection failures, rate limiting (429) and server errors
    /// (5xx) are transient; everything else is permanent for the life of the
    /// request.
    pub fn is_retriable(&self) -> bool {
        match self {
            FetchError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            FetchError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            FetchError::MalformedPage(_) | FetchError::InvalidUrl(_) | FetchError::Io(_) => false,
        }
    }
}

/// Failures while invoking the external analytical engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine binary is not installed (or not on PATH).
    #[error(
        "duckdb executable not found on PATH. Install it from \
         https://duckdb.org/docs/installation and make sure the `duckdb` \
         binary is on your PATH, then re-run this command"
    )]
    NotFound,

    /// The engine process could not be started.
    #[error("failed to launch {binary}: {source}")]
    Spawn {
        /// Path of the binary that failed to start.
        binary: String,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The engine ran but exited unsuccessfully.
    #[error("engine exited with {status}: {stderr}")]
    Failed {
        /// Exit status of the engine process.
        status: std::process::ExitStatus,
        /// Captured standard error of the engine process.
        stderr: String,
    },
}

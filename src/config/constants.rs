//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the
//! application, including defaults, thresholds, and retry parameters.

/// Default number of rows requested per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10_000;

/// Row-count threshold above which an interactive confirmation is required
/// before any page is fetched (unless `--yes` or an explicit `--limit` is
/// given).
pub const CONFIRMATION_THRESHOLD: u64 = 50_000;

/// Per-request HTTP timeout in seconds.
///
/// Large pages from slow catalog endpoints can take a while to stream; 30s
/// keeps the worst case bounded without failing healthy-but-big pages.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Retry strategy
/// Base multiplier in milliseconds for the exponential backoff between page
/// retries. The first retry waits ~2x this value, doubling afterwards.
pub const RETRY_DELAY_FACTOR_MS: u64 = 250;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 15;
/// Maximum number of attempts per page fetch (including the initial attempt).
/// Only transport-class failures are retried; a malformed page body is not.
pub const RETRY_MAX_ATTEMPTS: usize = 3;

/// Default catalog discovery endpoint used by the `search` subcommand.
pub const DEFAULT_CATALOG_URL: &str = "https://api.us.socrata.com/api/catalog/v1";

/// Default number of search results listed.
pub const DEFAULT_SEARCH_LIMIT: u64 = 20;

/// Default path of the append-only query history log written by `analyze`.
pub const DEFAULT_QUERY_LOG: &str = "./query_log.jsonl";

/// User-Agent sent with every catalog request.
pub const DEFAULT_USER_AGENT: &str = concat!("opendata_tools/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the optional catalog application token.
pub const APP_TOKEN_ENV: &str = "OPENDATA_APP_TOKEN";

/// Request header the application token is sent in.
pub const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Maximum number of response-body characters echoed into error messages.
/// Catalog error pages can be full HTML documents; truncating keeps the
/// error chain readable.
pub const ERROR_BODY_PREVIEW_CHARS: usize = 300;

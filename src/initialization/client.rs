//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

/// Initializes the HTTP client shared by all catalog requests.
///
/// Creates a `reqwest::Client` configured with:
/// - Per-request timeout
/// - User-Agent header
/// - Redirect following enabled (reqwest default)
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(timeout_seconds: u64, user_agent: &str) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(user_agent.to_string())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_builds() {
        let client = init_client(10, "opendata_tools/test");
        assert!(client.is_ok());
    }
}

//! Catalog discovery search.
//!
//! One GET against the catalog search API with a free-text query; the
//! response is decoded leniently so partially filled results still list.

use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;
use url::Url;

/// Parameters of one search invocation.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Search endpoint URL.
    pub catalog_url: String,
    /// Free-text query.
    pub query: String,
    /// Restrict results to one catalog domain.
    pub domain: Option<String>,
    /// Maximum number of results requested.
    pub limit: u64,
}

/// Decoded search response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// The matching datasets, up to the requested limit.
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// Total matches known to the catalog, across all pages.
    #[serde(default, rename = "resultSetSize")]
    pub result_set_size: u64,
}

/// One search hit.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    /// The dataset this hit describes.
    #[serde(default)]
    pub resource: ResourceSummary,
}

/// Catalog metadata of one dataset.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceSummary {
    /// Dataset identifier, usable with the `download` subcommand.
    #[serde(default)]
    pub id: String,
    /// Human-readable dataset name.
    #[serde(default)]
    pub name: String,
    /// Free-text description, often long.
    #[serde(default)]
    pub description: String,
}

/// Issues the search request and decodes the response.
pub async fn run_search(
    request: &SearchRequest,
    http: &reqwest::Client,
) -> Result<SearchResponse> {
    let mut url = Url::parse(&request.catalog_url).context("Invalid catalog URL")?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("q", &request.query);
        if let Some(domain) = &request.domain {
            pairs.append_pair("domains", domain);
        }
        pairs.append_pair("limit", &request.limit.to_string());
    }

    debug!("GET {url}");
    let response = http
        .get(url)
        .send()
        .await
        .context("Catalog search request failed")?;
    let status = response.status();
    if !status.is_success() {
        bail!("catalog search returned HTTP {status}");
    }
    response
        .json::<SearchResponse>()
        .await
        .context("Failed to decode catalog search response")
}

/// Formats one hit for the listing: id and name, with a trimmed
/// single-line description underneath when one exists.
pub fn format_result(result: &SearchResult) -> String {
    let description = result
        .resource
        .description
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let description = if description.chars().count() > 120 {
        let truncated: String = description.chars().take(117).collect();
        format!("{truncated}...")
    } else {
        description
    };

    if description.is_empty() {
        format!("{}  {}", result.resource.id, result.resource.name)
    } else {
        format!(
            "{}  {}\n    {}",
            result.resource.id, result.resource.name, description
        )
    }
}

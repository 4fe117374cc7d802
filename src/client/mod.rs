//! Remote query client for the catalog's tabular-data API.
//!
//! All requests are GETs against `{base}/resource/{dataset}.{ext}` with the
//! query-language parameters (`$where`, `$select`, `$order`, `$limit`,
//! `$offset`) passed through verbatim; the client performs no validation of
//! the query-language syntax.

use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value};
use url::Url;

use crate::config::{OutputFormat, APP_TOKEN_HEADER, ERROR_BODY_PREVIEW_CHARS};
use crate::download::PageSource;
use crate::error::FetchError;

/// Filter, projection, and ordering parameters for one dataset query.
///
/// All three are opaque to this crate; they are handed to the remote source
/// unexamined.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    /// Filter predicate (`$where`), passed through verbatim.
    pub predicate: Option<String>,
    /// Columns to project (`$select`), joined with commas.
    pub select: Vec<String>,
    /// Ordering clause (`$order`), passed through verbatim.
    pub order: Option<String>,
}

/// HTTP client bound to one catalog domain.
pub struct CatalogClient {
    http: reqwest::Client,
    base: Url,
    app_token: Option<String>,
}

impl CatalogClient {
    /// Creates a client for the catalog at `base`, optionally authenticating
    /// with an application token.
    pub fn new(http: reqwest::Client, base: Url, app_token: Option<String>) -> Self {
        Self {
            http,
            base,
            app_token,
        }
    }

    /// Normalizes a `--domain` value into a base URL. Bare host names get an
    /// `https://` scheme; full URLs are taken as given.
    pub fn parse_base(domain: &str) -> Result<Url, url::ParseError> {
        if domain.starts_with("http://") || domain.starts_with("https://") {
            Url::parse(domain)
        } else {
            Url::parse(&format!("https://{domain}"))
        }
    }

    /// Fetches one page of rows, returning the raw response body.
    pub async fn fetch_page(
        &self,
        dataset: &str,
        format: OutputFormat,
        query: &QueryParams,
        limit: u64,
        offset: u64,
    ) -> Result<String, FetchError> {
        let mut url = self
            .base
            .join(&format!("resource/{}.{}", dataset, format.extension()))?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(predicate) = &query.predicate {
                pairs.append_pair("$where", predicate);
            }
            if !query.select.is_empty() {
                pairs.append_pair("$select", &query.select.join(","));
            }
            if let Some(order) = &query.order {
                pairs.append_pair("$order", order);
            }
            pairs.append_pair("$limit", &limit.to_string());
            pairs.append_pair("$offset", &offset.to_string());
        }
        self.get_text(url).await
    }

    /// Asks the remote source how many rows match `predicate`.
    ///
    /// The count query is the same GET with an aggregate-count projection;
    /// the response is a single-element array holding one count field. An
    /// absent or malformed count parses as zero.
    pub async fn count_rows(
        &self,
        dataset: &str,
        predicate: Option<&str>,
    ) -> Result<u64, FetchError> {
        let mut url = self.base.join(&format!("resource/{dataset}.json"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("$select", "count(*) AS count");
            if let Some(predicate) = predicate {
                pairs.append_pair("$where", predicate);
            }
        }
        let body = self.get_text(url).await?;
        Ok(parse_count(&body))
    }

    async fn get_text(&self, url: Url) -> Result<String, FetchError> {
        debug!("GET {url}");
        let mut request = self.http.get(url.clone());
        if let Some(token) = &self.app_token {
            request = request.header(APP_TOKEN_HEADER, token);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
                body: preview(&body),
            });
        }
        Ok(body)
    }
}

/// One dataset bound to a client: the `PageSource` used by the downloader.
pub struct DatasetPages<'a> {
    client: &'a CatalogClient,
    dataset: &'a str,
    format: OutputFormat,
    query: &'a QueryParams,
}

impl<'a> DatasetPages<'a> {
    /// Binds `client` to one dataset and query for the life of a download.
    pub fn new(
        client: &'a CatalogClient,
        dataset: &'a str,
        format: OutputFormat,
        query: &'a QueryParams,
    ) -> Self {
        Self {
            client,
            dataset,
            format,
            query,
        }
    }
}

#[async_trait]
impl PageSource for DatasetPages<'_> {
    async fn fetch_page(&self, limit: u64, offset: u64) -> Result<String, FetchError> {
        self.client
            .fetch_page(self.dataset, self.format, self.query, limit, offset)
            .await
    }
}

fn parse_count(body: &str) -> u64 {
    let rows: Vec<Map<String, Value>> = match serde_json::from_str(body) {
        Ok(rows) => rows,
        Err(_) => return 0,
    };
    let Some(first) = rows.first() else { return 0 };
    let Some(value) = first.values().next() else {
        return 0;
    };
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() > ERROR_BODY_PREVIEW_CHARS {
        let mut cut: String = trimmed.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        trimmed.to_string()
    }
}

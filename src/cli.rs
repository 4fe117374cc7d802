//! Command-line interface definitions.
//!
//! Three subcommands, one per tool: `search`, `download`, `analyze`. Flags
//! are long-form only; clap rejects unknown or malformed flags before any
//! work is performed.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::analyze::AnalyzeRequest;
use crate::client::QueryParams;
use crate::config::{
    EngineFormat, LogFormat, LogLevel, OutputFormat, DEFAULT_CATALOG_URL, DEFAULT_PAGE_SIZE,
    DEFAULT_QUERY_LOG, DEFAULT_SEARCH_LIMIT, HTTP_TIMEOUT_SECS,
};
use crate::download::DownloadRequest;
use crate::search::SearchRequest;

/// Top-level command-line interface.
#[derive(Debug, Parser)]
#[command(
    name = "opendata_tools",
    version,
    about = "Search, download, and analyze open-data catalog datasets"
)]
pub struct Cli {
    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// The tool to run.
    #[command(subcommand)]
    pub command: Command,
}

/// The three tools.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the catalog for datasets
    Search(SearchArgs),
    /// Download a dataset page by page into a local file
    Download(DownloadArgs),
    /// Run a SQL query against a downloaded file
    Analyze(AnalyzeArgs),
}

/// Flags of the `search` subcommand.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text search query
    #[arg(long)]
    pub query: String,

    /// Restrict results to one catalog domain (host name)
    #[arg(long)]
    pub domain: Option<String>,

    /// Maximum number of results to list
    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: u64,

    /// Catalog search endpoint
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,
}

impl SearchArgs {
    /// Builds the search request.
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest {
            catalog_url: self.catalog_url.clone(),
            query: self.query.clone(),
            domain: self.domain.clone(),
            limit: self.limit,
        }
    }
}

/// Flags of the `download` subcommand.
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Catalog domain the dataset lives on (host name or full URL)
    #[arg(long)]
    pub domain: String,

    /// Dataset identifier
    #[arg(long)]
    pub dataset: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Filter predicate, passed through to the remote source verbatim
    #[arg(long = "where")]
    pub predicate: Option<String>,

    /// Columns to project (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<String>,

    /// Ordering clause, passed through verbatim
    #[arg(long)]
    pub order: Option<String>,

    /// Rows fetched per page
    #[arg(
        long,
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub page_size: u64,

    /// Stop after this many rows
    #[arg(long)]
    pub limit: Option<u64>,

    /// Destination file
    #[arg(long)]
    pub output: PathBuf,

    /// Skip the pre-count and the large-download confirmation prompt
    #[arg(long)]
    pub yes: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout_seconds: u64,
}

impl DownloadArgs {
    /// Builds the validated download request.
    pub fn to_request(&self) -> DownloadRequest {
        DownloadRequest {
            dataset: self.dataset.clone(),
            format: self.format,
            query: QueryParams {
                predicate: self.predicate.clone(),
                select: self.select.clone(),
                order: self.order.clone(),
            },
            page_size: self.page_size,
            limit: self.limit,
            destination: self.output.clone(),
            assume_yes: self.yes,
        }
    }
}

/// Flags of the `analyze` subcommand.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Materialized dataset file to query
    #[arg(long)]
    pub file: PathBuf,

    /// SQL query; the file is addressable as the `dataset` relation
    #[arg(long)]
    pub query: String,

    /// Engine output format
    #[arg(long, value_enum, default_value_t = EngineFormat::Table)]
    pub format: EngineFormat,

    /// Write the query output to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Where to append the query history log
    #[arg(long, default_value = DEFAULT_QUERY_LOG)]
    pub query_log: PathBuf,
}

impl AnalyzeArgs {
    /// Builds the analyze request.
    pub fn to_request(&self) -> AnalyzeRequest {
        AnalyzeRequest {
            file: self.file.clone(),
            query: self.query.clone(),
            format: self.format,
            output: self.output.clone(),
            query_log: self.query_log.clone(),
        }
    }
}

//! opendata_tools library: catalog search, chunked dataset download, and
//! external-engine analysis.
//!
//! Three tools over a public open-data catalog: `search` finds datasets,
//! `download` materializes one as a local CSV or JSON file by paginating the
//! catalog's tabular-data API, and `analyze` runs ad-hoc SQL over the
//! downloaded file through a locally installed DuckDB binary.
//!
//! # Example
//!
//! ```no_run
//! use opendata_tools::client::{CatalogClient, QueryParams};
//! use opendata_tools::config::OutputFormat;
//! use opendata_tools::download::{run_download, DownloadRequest, StdinPrompt};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let http = reqwest::Client::new();
//! let base = CatalogClient::parse_base("data.example.gov")?;
//! let catalog = CatalogClient::new(http, base, None);
//!
//! let request = DownloadRequest {
//!     dataset: "abcd-1234".to_string(),
//!     format: OutputFormat::Csv,
//!     query: QueryParams::default(),
//!     page_size: 10_000,
//!     limit: None,
//!     destination: "rides.csv".into(),
//!     assume_yes: true,
//! };
//!
//! let outcome = run_download(&request, &catalog, &mut StdinPrompt, &CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod analyze;
pub mod cli;
pub mod client;
pub mod config;
pub mod download;
pub mod engine;
pub mod error;
pub mod initialization;
pub mod query_log;
pub mod search;

// Re-export public API
pub use cli::{AnalyzeArgs, Cli, Command, DownloadArgs, SearchArgs};
pub use config::{EngineFormat, LogFormat, LogLevel, OutputFormat};
pub use download::{run_download, DownloadOutcome, DownloadReport, DownloadRequest};
pub use error::{EngineError, FetchError};

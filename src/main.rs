//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `opendata_tools` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use opendata_tools::analyze;
use opendata_tools::cli::{Cli, Command};
use opendata_tools::client::CatalogClient;
use opendata_tools::config::{APP_TOKEN_ENV, DEFAULT_USER_AGENT, HTTP_TIMEOUT_SECS};
use opendata_tools::download::{self, DownloadOutcome, StdinPrompt};
use opendata_tools::engine::DuckDbCli;
use opendata_tools::error::EngineError;
use opendata_tools::initialization::{init_client, init_logger_with};
use opendata_tools::search;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting OPENDATA_APP_TOKEN without exporting it manually
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("opendata_tools error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Search(args) => {
            let http = init_client(HTTP_TIMEOUT_SECS, DEFAULT_USER_AGENT)
                .context("Failed to initialize HTTP client")?;
            let response = search::run_search(&args.to_request(), &http).await?;

            for result in &response.results {
                println!("{}", search::format_result(result));
            }
            println!(
                "{} of {} matching dataset{} shown",
                response.results.len(),
                response.result_set_size,
                if response.result_set_size == 1 { "" } else { "s" }
            );
            Ok(())
        }
        Command::Download(args) => {
            let http = init_client(args.timeout_seconds, DEFAULT_USER_AGENT)
                .context("Failed to initialize HTTP client")?;
            let base = CatalogClient::parse_base(&args.domain).context("Invalid --domain value")?;
            let app_token = std::env::var(APP_TOKEN_ENV).ok();
            let catalog = CatalogClient::new(http, base, app_token);
            let request = args.to_request();

            // Ctrl-C cancels between pages; the file is finalized with
            // whatever was committed so far
            let cancel = CancellationToken::new();
            let cancel_on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel_on_signal.cancel();
                }
            });

            let mut prompt = StdinPrompt;
            match download::run_download(&request, &catalog, &mut prompt, &cancel).await? {
                DownloadOutcome::Completed(report) => {
                    println!(
                        "✅ Downloaded {} row{} in {} page{} to {} in {:.1}s",
                        report.rows,
                        if report.rows == 1 { "" } else { "s" },
                        report.pages,
                        if report.pages == 1 { "" } else { "s" },
                        report.destination.display(),
                        report.elapsed_seconds
                    );
                    Ok(())
                }
                DownloadOutcome::Cancelled => {
                    println!("Download cancelled");
                    Ok(())
                }
            }
        }
        Command::Analyze(args) => {
            let engine = DuckDbCli::from_path().ok_or(EngineError::NotFound)?;
            let request = args.to_request();
            let write_to_stdout = request.output.is_none();
            let stdout = analyze::run_analyze(&request, &engine).await?;
            if write_to_stdout {
                print!("{stdout}");
            }
            Ok(())
        }
    }
}

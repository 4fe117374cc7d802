//! Chunked dataset downloader.
//!
//! Fetches a filtered dataset page by page, appending each page to a single
//! output file so that at most one page is held in memory at a time. Pages
//! are requested strictly sequentially in increasing offset order; there is
//! no prefetching, so the output row order is the order the remote source
//! would produce for one unpaginated query with the same parameters.

mod confirm;
mod progress;
mod sink;

pub use confirm::{confirm_large_download, ConfirmPrompt, GateDecision, StdinPrompt};
pub use progress::DownloadProgress;
pub use sink::OutputSink;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tokio_util::sync::CancellationToken;

use crate::client::{CatalogClient, DatasetPages, QueryParams};
use crate::config::{
    OutputFormat, RETRY_DELAY_FACTOR_MS, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY_SECS,
};
use crate::error::FetchError;

/// One paginated fetch against the remote source.
///
/// The production implementation is [`DatasetPages`]; tests substitute
/// scripted sources.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches at most `limit` rows starting at `offset`, returning the raw
    /// page body in the request's output format.
    async fn fetch_page(&self, limit: u64, offset: u64) -> Result<String, FetchError>;
}

/// A validated download request.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Dataset identifier (opaque catalog key).
    pub dataset: String,
    /// Output format, fixed for the life of the request.
    pub format: OutputFormat,
    /// Filter, projection, and ordering parameters.
    pub query: QueryParams,
    /// Rows requested per page; always positive.
    pub page_size: u64,
    /// Absolute row limit; the downloader never fetches past it.
    pub limit: Option<u64>,
    /// Destination file path.
    pub destination: PathBuf,
    /// Skip the pre-count and the large-download confirmation.
    pub assume_yes: bool,
}

/// Summary of a completed download.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    /// Rows committed to the destination.
    pub rows: u64,
    /// Pages fetched.
    pub pages: u64,
    /// Where the rows were written.
    pub destination: PathBuf,
    /// Wall-clock time in seconds.
    pub elapsed_seconds: f64,
}

/// How a download call ended.
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    /// The loop ran to completion; the destination file is complete and
    /// correctly framed.
    Completed(DownloadReport),
    /// The operator declined the confirmation gate, or cancellation was
    /// requested between pages. Not an error.
    Cancelled,
}

fn retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(RETRY_DELAY_FACTOR_MS)
        .max_delay(Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .map(jitter)
        .take(RETRY_MAX_ATTEMPTS - 1)
}

/// Runs the pagination loop for one request.
///
/// `total` is the known row total (an explicit limit or a pre-count), used
/// for progress percentages; `None` means unknown. Each iteration caps the
/// page at `min(page_size, remaining-to-limit)`, fetches one page (with
/// bounded retries for transient failures), commits it to the sink, and
/// advances the offset by the rows the page actually returned. A page
/// returning fewer rows than requested is the end-of-data signal; reaching
/// the absolute limit stops the loop without issuing another fetch.
///
/// On any fetch or parse failure the download aborts; whatever was flushed
/// through the last committed page stays on disk, and in JSON mode the
/// closing bracket is absent.
pub async fn download_dataset(
    request: &DownloadRequest,
    source: &dyn PageSource,
    total: Option<u64>,
    cancel: &CancellationToken,
) -> Result<DownloadOutcome> {
    let started = Instant::now();

    if let Some(parent) = request.destination.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }
    }
    let mut sink = OutputSink::create(&request.destination, request.format).with_context(|| {
        format!(
            "Failed to create output file {}",
            request.destination.display()
        )
    })?;

    let mut progress = DownloadProgress::new(total);
    let mut pages: u64 = 0;

    loop {
        if cancel.is_cancelled() {
            warn!(
                "cancellation requested, stopping after {} committed rows",
                progress.committed
            );
            // No partial page was committed, so the frame can be closed.
            sink.finish().context("Failed to finalize output file")?;
            return Ok(DownloadOutcome::Cancelled);
        }

        let cap = match request.limit {
            Some(limit) => request.page_size.min(limit.saturating_sub(progress.committed)),
            None => request.page_size,
        };
        if cap == 0 {
            break;
        }

        let offset = progress.offset;
        let body = RetryIf::spawn(
            retry_strategy(),
            || source.fetch_page(cap, offset),
            |err: &FetchError| {
                let retriable = err.is_retriable();
                if retriable {
                    warn!("page fetch at offset {offset} failed ({err}), retrying");
                }
                retriable
            },
        )
        .await
        .with_context(|| format!("Failed to fetch page at offset {offset}"))?;

        pages += 1;
        let rows = sink
            .append_page(&body, pages == 1)
            .with_context(|| format!("Failed to append page at offset {offset}"))?;
        progress.advance(rows);
        progress.report();

        if rows < cap {
            debug!("short page at offset {offset} ({rows} of {cap} rows), end of data");
            break;
        }
    }

    sink.finish().context("Failed to finalize output file")?;
    Ok(DownloadOutcome::Completed(DownloadReport {
        rows: progress.committed,
        pages,
        destination: request.destination.clone(),
        elapsed_seconds: started.elapsed().as_secs_f64(),
    }))
}

/// Orchestrates one download end to end.
///
/// Determines the known total (the explicit limit when set, otherwise a
/// pre-count unless suppressed with `--yes`), applies the large-download
/// confirmation gate, then runs the pagination loop. A pre-count of zero
/// short-circuits the loop: no page is fetched, but the destination is still
/// created and correctly framed.
pub async fn run_download(
    request: &DownloadRequest,
    client: &CatalogClient,
    prompt: &mut dyn ConfirmPrompt,
    cancel: &CancellationToken,
) -> Result<DownloadOutcome> {
    let total = match request.limit {
        Some(limit) => Some(limit),
        None if !request.assume_yes => {
            let count = client
                .count_rows(&request.dataset, request.query.predicate.as_deref())
                .await
                .context("Failed to count matching rows")?;
            info!("{count} rows match");
            Some(count)
        }
        None => None,
    };

    if request.limit.is_none() {
        match confirm_large_download(total, prompt).context("Failed to read confirmation")? {
            GateDecision::Proceed => {}
            GateDecision::Declined => return Ok(DownloadOutcome::Cancelled),
        }
    }

    let effective = if total == Some(0) && request.limit.is_none() {
        let mut bounded = request.clone();
        bounded.limit = Some(0);
        bounded
    } else {
        request.clone()
    };

    let source = DatasetPages::new(client, &effective.dataset, effective.format, &effective.query);
    download_dataset(&effective, &source, total, cancel).await
}

//! Ad-hoc SQL analysis over a materialized dataset file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::config::EngineFormat;
use crate::engine::{build_script, EngineOutput, QueryEngine};
use crate::query_log::QueryLog;

/// Configuration for one `analyze` invocation.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    /// Materialized dataset file to query.
    pub file: PathBuf,
    /// SQL query; the file is addressable as the `dataset` relation.
    pub query: String,
    /// Output rendering requested from the engine.
    pub format: EngineFormat,
    /// Write the engine output here instead of stdout.
    pub output: Option<PathBuf>,
    /// Where the query history log is appended.
    pub query_log: PathBuf,
}

/// Runs `request.query` against `request.file` through `engine`.
///
/// Returns the engine's stdout unmodified; when `--output` was given the
/// same bytes have already been written there. The query is recorded in the
/// history log before execution; a log write failure is a warning, never a
/// reason to skip the query.
pub async fn run_analyze(request: &AnalyzeRequest, engine: &dyn QueryEngine) -> Result<String> {
    if !request.file.exists() {
        bail!("input file {} does not exist", request.file.display());
    }

    let script = build_script(&request.file, &request.query);

    if let Err(e) = QueryLog::new(&request.query_log).append(&request.file, &request.query) {
        warn!(
            "failed to record query in {}: {e}",
            request.query_log.display()
        );
    }

    info!("running query through {}", engine.name());
    let EngineOutput { stdout, stderr } = engine
        .run_script(&script, request.format)
        .await
        .context("Query execution failed")?;
    if !stderr.trim().is_empty() {
        warn!("{}", stderr.trim());
    }

    if let Some(output) = &request.output {
        std::fs::write(output, &stdout)
            .with_context(|| format!("Failed to write query output to {}", output.display()))?;
        info!("query output written to {}", output.display());
    }

    Ok(stdout)
}

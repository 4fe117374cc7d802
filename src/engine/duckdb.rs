//! DuckDB CLI engine.
//!
//! Executes scripts through a locally installed `duckdb` binary, passing the
//! whole script as a single inline `-c` argument and capturing stdio.

use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use super::{EngineOutput, QueryEngine};
use crate::config::EngineFormat;
use crate::error::EngineError;

const BINARY_NAME: &str = "duckdb";

/// [`QueryEngine`] backed by the external `duckdb` command-line binary.
pub struct DuckDbCli {
    binary_path: PathBuf,
}

impl DuckDbCli {
    /// Creates an engine with an explicit binary path.
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Looks the binary up on PATH. `None` means it is not installed, which
    /// the caller reports as a precondition failure with remediation
    /// instructions rather than a crash.
    pub fn from_path() -> Option<Self> {
        which::which(BINARY_NAME).ok().map(Self::new)
    }
}

#[async_trait]
impl QueryEngine for DuckDbCli {
    async fn run_script(
        &self,
        script: &str,
        format: EngineFormat,
    ) -> Result<EngineOutput, EngineError> {
        let mut command = Command::new(&self.binary_path);
        command.arg("-batch");
        if let Some(flag) = format.engine_flag() {
            command.arg(flag);
        }
        command.arg("-c").arg(script);

        debug!(
            "running {} with a {}-byte script",
            self.binary_path.display(),
            script.len()
        );
        let output = command.output().await.map_err(|source| EngineError::Spawn {
            binary: self.binary_path.display().to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(EngineError::Failed {
                status: output.status,
                stderr,
            });
        }
        Ok(EngineOutput { stdout, stderr })
    }

    fn name(&self) -> &'static str {
        BINARY_NAME
    }
}

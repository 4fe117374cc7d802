//! External analytical engine integration.
//!
//! The downloader materializes datasets as local files; ad-hoc analysis is
//! delegated to an external SQL engine invoked as a subprocess. Nothing else
//! in this crate spawns processes directly; everything goes through the
//! [`QueryEngine`] seam so the engine stays swappable and tests can script
//! it.

mod duckdb;

pub use duckdb::DuckDbCli;

use std::path::Path;

use async_trait::async_trait;

use crate::config::EngineFormat;
use crate::error::EngineError;

/// Captured output of one engine invocation.
#[derive(Debug)]
pub struct EngineOutput {
    /// Everything the engine wrote to stdout.
    pub stdout: String,
    /// Everything the engine wrote to stderr.
    pub stderr: String,
}

/// An engine that can execute a SQL script and hand back its output.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Runs `script` as one inline invocation, rendering results in `format`.
    async fn run_script(
        &self,
        script: &str,
        format: EngineFormat,
    ) -> Result<EngineOutput, EngineError>;

    /// Short name for log lines.
    fn name(&self) -> &'static str;
}

/// Builds the two-statement analysis script: load the file into a relation
/// named `dataset`, then run the caller's query against it verbatim.
pub fn build_script(file: &Path, query: &str) -> String {
    // Single quotes in the path are doubled for SQL string-literal escaping
    let path = file.to_string_lossy().replace('\'', "''");
    format!("CREATE VIEW dataset AS SELECT * FROM '{path}';\n{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_script_loads_then_queries() {
        let script = build_script(
            &PathBuf::from("/tmp/rides.csv"),
            "SELECT count(*) FROM dataset",
        );
        assert_eq!(
            script,
            "CREATE VIEW dataset AS SELECT * FROM '/tmp/rides.csv';\nSELECT count(*) FROM dataset"
        );
    }

    #[test]
    fn test_build_script_escapes_quotes_in_path() {
        let script = build_script(&PathBuf::from("/tmp/o'hare.csv"), "SELECT 1");
        assert!(script.contains("'/tmp/o''hare.csv'"));
    }

    #[test]
    fn test_build_script_passes_query_through_verbatim() {
        let query = "SELECT mode, count(*) AS n FROM dataset GROUP BY mode ORDER BY n DESC";
        let script = build_script(&PathBuf::from("data.json"), query);
        assert!(script.ends_with(query));
    }
}

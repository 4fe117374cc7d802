//! Append-only log of analysis queries.
//!
//! One JSON line per issued query. The log is a side channel: failures to
//! write it never fail the query itself.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

#[derive(Serialize)]
struct QueryLogEntry<'a> {
    ts: i64,
    file: &'a str,
    query: &'a str,
}

/// Append-only query history at a fixed path.
pub struct QueryLog {
    path: PathBuf,
}

impl QueryLog {
    /// Points the log at `path`; the file is created on first append.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Appends one entry with the current timestamp.
    pub fn append(&self, file: &Path, query: &str) -> std::io::Result<()> {
        let entry = QueryLogEntry {
            ts: Utc::now().timestamp_millis(),
            file: &file.to_string_lossy(),
            query,
        };
        let line = serde_json::to_string(&entry)?;
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        log.write_all(line.as_bytes())?;
        log.write_all(b"\n")
    }
}

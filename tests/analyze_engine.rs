//! Analyze orchestration against a scripted engine.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use opendata_tools::analyze::{run_analyze, AnalyzeRequest};
use opendata_tools::config::EngineFormat;
use opendata_tools::engine::{EngineOutput, QueryEngine};
use opendata_tools::error::EngineError;

/// Engine double that records every script it is asked to run.
struct ScriptedEngine {
    stdout: String,
    runs: Mutex<Vec<(String, EngineFormat)>>,
}

impl ScriptedEngine {
    fn new(stdout: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            runs: Mutex::new(Vec::new()),
        }
    }

    fn runs(&self) -> Vec<(String, EngineFormat)> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryEngine for ScriptedEngine {
    async fn run_script(
        &self,
        script: &str,
        format: EngineFormat,
    ) -> Result<EngineOutput, EngineError> {
        self.runs.lock().unwrap().push((script.to_string(), format));
        Ok(EngineOutput {
            stdout: self.stdout.clone(),
            stderr: String::new(),
        })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn request(dir: &TempDir, file: PathBuf) -> AnalyzeRequest {
    AnalyzeRequest {
        file,
        query: "SELECT mode, count(*) FROM dataset GROUP BY mode".to_string(),
        format: EngineFormat::Csv,
        output: None,
        query_log: dir.path().join("queries.jsonl"),
    }
}

#[tokio::test]
async fn builds_a_load_then_query_script() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("rides.csv");
    std::fs::write(&file, "mode,day\nbus,mon\n").unwrap();

    let engine = ScriptedEngine::new("mode,count\nbus,1\n");
    let stdout = run_analyze(&request(&dir, file.clone()), &engine).await.unwrap();

    assert_eq!(stdout, "mode,count\nbus,1\n");
    let runs = engine.runs();
    assert_eq!(runs.len(), 1);
    let (script, format) = &runs[0];
    assert!(script.starts_with(&format!(
        "CREATE VIEW dataset AS SELECT * FROM '{}';",
        file.display()
    )));
    assert!(script.ends_with("SELECT mode, count(*) FROM dataset GROUP BY mode"));
    assert_eq!(*format, EngineFormat::Csv);
}

#[tokio::test]
async fn writes_engine_output_to_a_file_when_requested() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("rides.csv");
    std::fs::write(&file, "mode,day\nbus,mon\n").unwrap();

    let mut req = request(&dir, file);
    let output = dir.path().join("result.csv");
    req.output = Some(output.clone());

    let engine = ScriptedEngine::new("mode,count\nbus,1\n");
    run_analyze(&req, &engine).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "mode,count\nbus,1\n"
    );
}

#[tokio::test]
async fn missing_input_file_fails_before_the_engine_runs() {
    let dir = TempDir::new().unwrap();
    let engine = ScriptedEngine::new("");

    let result = run_analyze(&request(&dir, dir.path().join("absent.csv")), &engine).await;

    assert!(result.is_err());
    assert!(engine.runs().is_empty());
}

#[tokio::test]
async fn every_query_is_appended_to_the_history_log() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("rides.csv");
    std::fs::write(&file, "mode,day\nbus,mon\n").unwrap();

    let engine = ScriptedEngine::new("ok");
    let req = request(&dir, file);
    run_analyze(&req, &engine).await.unwrap();
    run_analyze(&req, &engine).await.unwrap();

    let log = std::fs::read_to_string(&req.query_log).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    let entry: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(entry["query"], "SELECT mode, count(*) FROM dataset GROUP BY mode");
}

/// Engine double that always fails.
struct BrokenEngine;

#[async_trait]
impl QueryEngine for BrokenEngine {
    async fn run_script(
        &self,
        _script: &str,
        _format: EngineFormat,
    ) -> Result<EngineOutput, EngineError> {
        Err(EngineError::NotFound)
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

#[tokio::test]
async fn engine_failure_surfaces_with_remediation() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("rides.csv");
    std::fs::write(&file, "mode,day\n").unwrap();

    let result = run_analyze(&request(&dir, file), &BrokenEngine).await;
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("duckdb"));
    assert!(message.contains("PATH"));
}

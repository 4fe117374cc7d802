//! Output file framing for downloaded pages.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};

use crate::config::OutputFormat;
use crate::error::FetchError;

/// The destination file for one download.
///
/// Created (truncated) up front, appended to once per page, and finalized
/// exactly once on normal completion. The sink owns the file handle
/// exclusively for the life of the download; an abort drops it, which
/// flushes and closes without writing the closing frame.
pub struct OutputSink {
    writer: BufWriter<File>,
    format: OutputFormat,
    records_written: u64,
}

impl OutputSink {
    /// Creates or truncates the destination and writes the opening frame.
    pub fn create(path: &Path, format: OutputFormat) -> std::io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        if matches!(format, OutputFormat::Json) {
            writer.write_all(b"[")?;
        }
        Ok(Self {
            writer,
            format,
            records_written: 0,
        })
    }

    /// Appends one page body, returning the number of rows it contained.
    ///
    /// Text pages keep their header line only when they are the first page;
    /// every later page's (structurally identical) header is discarded. JSON
    /// pages are parsed in full before anything is written, so a malformed
    /// page leaves the file exactly as the previous page left it.
    pub fn append_page(&mut self, body: &str, first_page: bool) -> Result<u64, FetchError> {
        match self.format {
            OutputFormat::Csv => self.append_text_page(body, first_page),
            OutputFormat::Json => self.append_json_page(body),
        }
    }

    fn append_text_page(&mut self, body: &str, first_page: bool) -> Result<u64, FetchError> {
        let mut lines = body.lines();
        let Some(header) = lines.next() else {
            return Ok(0);
        };
        if first_page {
            self.writer.write_all(header.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        let mut rows = 0u64;
        for line in lines {
            self.writer.write_all(line.as_bytes())?;
            self.writer.write_all(b"\n")?;
            rows += 1;
        }
        Ok(rows)
    }

    fn append_json_page(&mut self, body: &str) -> Result<u64, FetchError> {
        // Records keep their field order through parse and re-serialization
        // (serde_json's preserve_order feature), so identical data downloaded
        // at different page sizes serializes identically.
        let records: Vec<Map<String, Value>> = serde_json::from_str(body)
            .map_err(|e| FetchError::MalformedPage(format!("expected a JSON array of records: {e}")))?;
        let mut chunk = String::new();
        for record in &records {
            chunk.push_str(if self.records_written == 0 {
                "\n  "
            } else {
                ",\n  "
            });
            let rendered = serde_json::to_string(record)
                .map_err(|e| FetchError::MalformedPage(format!("unserializable record: {e}")))?;
            chunk.push_str(&rendered);
            self.records_written += 1;
        }
        self.writer.write_all(chunk.as_bytes())?;
        Ok(records.len() as u64)
    }

    /// Writes the closing frame and flushes.
    ///
    /// Only called when the pagination loop exits normally; an aborted JSON
    /// download deliberately lacks its closing bracket so callers cannot
    /// mistake it for a complete file.
    pub fn finish(mut self) -> std::io::Result<()> {
        if matches!(self.format, OutputFormat::Json) {
            self.writer.write_all(b"\n]\n")?;
        }
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_json_zero_pages_is_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let sink = OutputSink::create(&path, OutputFormat::Json).unwrap();
        sink.finish().unwrap();

        let content = read(&path);
        let parsed: Vec<Map<String, Value>> = serde_json::from_str(&content).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_json_pages_form_one_valid_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let mut sink = OutputSink::create(&path, OutputFormat::Json).unwrap();

        let rows1 = sink
            .append_page(r#"[{"mode":"bus","day":"mon"},{"mode":"rail","day":"mon"}]"#, true)
            .unwrap();
        let rows2 = sink
            .append_page(r#"[{"mode":"ferry","day":"tue"}]"#, false)
            .unwrap();
        sink.finish().unwrap();

        assert_eq!(rows1, 2);
        assert_eq!(rows2, 1);
        let parsed: Vec<Map<String, Value>> = serde_json::from_str(&read(&path)).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[2]["mode"], "ferry");
    }

    #[test]
    fn test_json_record_field_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let mut sink = OutputSink::create(&path, OutputFormat::Json).unwrap();

        sink.append_page(r#"[{"zulu":"1","alpha":"2"}]"#, true).unwrap();
        sink.finish().unwrap();

        let content = read(&path);
        assert!(content.find("zulu").unwrap() < content.find("alpha").unwrap());
    }

    #[test]
    fn test_json_malformed_page_commits_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let mut sink = OutputSink::create(&path, OutputFormat::Json).unwrap();

        sink.append_page(r#"[{"a":"1"}]"#, true).unwrap();
        let err = sink.append_page("<html>gateway error</html>", false);
        assert!(matches!(err, Err(FetchError::MalformedPage(_))));

        // The aborted file holds the committed page and no closing bracket
        drop(sink);
        let content = read(&path);
        assert!(content.contains(r#"{"a":"1"}"#));
        assert!(!content.trim_end().ends_with(']'));
    }

    #[test]
    fn test_json_empty_page_is_zero_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let mut sink = OutputSink::create(&path, OutputFormat::Json).unwrap();
        assert_eq!(sink.append_page("[]", true).unwrap(), 0);
        sink.finish().unwrap();
        let parsed: Vec<Map<String, Value>> = serde_json::from_str(&read(&path)).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_text_single_header_across_pages() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = OutputSink::create(&path, OutputFormat::Csv).unwrap();

        assert_eq!(sink.append_page("mode,day\nbus,mon\nrail,mon\n", true).unwrap(), 2);
        assert_eq!(sink.append_page("mode,day\nferry,tue\n", false).unwrap(), 1);
        sink.finish().unwrap();

        let content = read(&path);
        assert_eq!(content, "mode,day\nbus,mon\nrail,mon\nferry,tue\n");
        assert_eq!(content.matches("mode,day").count(), 1);
    }

    #[test]
    fn test_text_header_only_page_is_zero_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = OutputSink::create(&path, OutputFormat::Csv).unwrap();
        assert_eq!(sink.append_page("mode,day\n", true).unwrap(), 0);
        sink.finish().unwrap();
        assert_eq!(read(&path), "mode,day\n");
    }

    #[test]
    fn test_text_empty_body_is_zero_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = OutputSink::create(&path, OutputFormat::Csv).unwrap();
        assert_eq!(sink.append_page("", true).unwrap(), 0);
        sink.finish().unwrap();
        assert_eq!(read(&path), "");
    }

    #[test]
    fn test_create_truncates_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale content from a previous run\n").unwrap();

        let sink = OutputSink::create(&path, OutputFormat::Csv).unwrap();
        sink.finish().unwrap();
        assert_eq!(read(&path), "");
    }
}

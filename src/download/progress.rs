//! Download progress tracking.

use log::info;

/// Rows committed so far, the offset for the next page request, and the
/// total when one is known.
///
/// Lives for a single download call: created at the start, mutated once per
/// committed page, discarded when the call returns.
#[derive(Debug)]
pub struct DownloadProgress {
    /// Rows committed to the destination so far.
    pub committed: u64,
    /// Row offset for the next page request.
    pub offset: u64,
    /// Total matching rows, when pre-counted or bounded by an explicit limit.
    pub total: Option<u64>,
}

impl DownloadProgress {
    /// Starts tracking at offset zero.
    pub fn new(total: Option<u64>) -> Self {
        Self {
            committed: 0,
            offset: 0,
            total,
        }
    }

    /// Records one committed page of `rows` rows. The offset advances by the
    /// rows actually returned, not by the requested cap.
    pub fn advance(&mut self, rows: u64) {
        self.committed += rows;
        self.offset += rows;
    }

    /// Emits the per-page progress line.
    pub fn report(&self) {
        info!("{}", self.describe());
    }

    fn describe(&self) -> String {
        match self.total {
            Some(total) if total > 0 => {
                let pct = (self.committed as f64 / total as f64) * 100.0;
                format!(
                    "downloaded {} of {} rows ({:.1}%)",
                    self.committed, total, pct
                )
            }
            _ => format!("downloaded {} rows", self.committed),
        }
    }
}

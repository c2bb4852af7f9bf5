//! Output Writers
//!
//! Append-only JSONL snapshots for single runs and a pretty-printed JSON
//! report for batches. The engine never writes files; callers hand results
//! to these writers.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use committee_events::{BatchReport, CommitteeSnapshot};
use thiserror::Error;

/// Errors raised while writing simulation output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whether `round` is captured: the first round, every `interval` rounds
/// (never when `interval` is 0), and `final_round`.
pub fn captures(interval: u64, round: u64, final_round: u64) -> bool {
    round == 0 || round == final_round || (interval > 0 && round % interval == 0)
}

/// Writes one committee snapshot per line.
pub struct SnapshotWriter {
    writer: Option<BufWriter<File>>,
    interval: u64,
    written: u64,
}

impl SnapshotWriter {
    /// Create a writer truncating the file at `path`
    pub fn new(path: impl AsRef<Path>, interval: u64) -> Result<Self, OutputError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            interval,
            written: 0,
        })
    }

    /// Create a writer that discards snapshots
    pub fn null(interval: u64) -> Self {
        Self {
            writer: None,
            interval,
            written: 0,
        }
    }

    /// Number of snapshots accepted so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Write a snapshot unconditionally
    pub fn write(&mut self, snapshot: &CommitteeSnapshot) -> Result<(), OutputError> {
        self.written += 1;
        if let Some(ref mut writer) = self.writer {
            writeln!(writer, "{}", snapshot.to_jsonl()?)?;
        }
        Ok(())
    }

    /// Write the snapshot if its round is due for capture. Returns whether it was written.
    pub fn capture(&mut self, snapshot: &CommitteeSnapshot, final_round: u64) -> Result<bool, OutputError> {
        if !captures(self.interval, snapshot.round, final_round) {
            return Ok(false);
        }
        self.write(snapshot)?;
        Ok(true)
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> Result<(), OutputError> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("failed to flush snapshot writer: {}", e);
        }
    }
}

/// Writes a batch report as pretty JSON.
pub fn write_batch_report(path: impl AsRef<Path>, report: &BatchReport) -> Result<(), OutputError> {
    std::fs::write(path, report.to_json_pretty()?)?;
    Ok(())
}

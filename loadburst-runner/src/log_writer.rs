use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use loadburst_common::{LoadburstError, OutcomeRecord, Result};

use crate::config::BATCH_SIZE;

/// Thread-safe buffered sink for the durable outcome log. Records accumulate
/// in an in-memory buffer under a single mutex; when the buffer reaches the
/// batch threshold the same critical section appends every buffered line to
/// the destination file and clears the buffer, so append and flush never
/// interleave.
///
/// A failed flush is non-fatal: the error is reported and the batch is
/// dropped (no retry, no backpressure to callers).
#[derive(Debug)]
pub struct BatchedLogWriter {
    path: PathBuf,
    batch_size: usize,
    buffer: Mutex<Vec<OutcomeRecord>>,
}

impl BatchedLogWriter {
    /// Open `path` fresh (truncating any previous run's log) and return a
    /// writer that appends to it from then on. Failure here is an
    /// unrecoverable setup error; the run must not start.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_batch_size(path, BATCH_SIZE)
    }

    pub fn with_batch_size(path: impl Into<PathBuf>, batch_size: usize) -> Result<Self> {
        let path = path.into();
        fs::write(&path, "").map_err(|e| {
            LoadburstError::Persistence(format!("cannot open {}: {e}", path.display()))
        })?;
        Ok(Self {
            path,
            batch_size,
            buffer: Mutex::new(Vec::new()),
        })
    }

    /// Append one record, flushing if the buffer has reached the threshold.
    pub fn append(&self, record: OutcomeRecord) {
        let mut buffer = self.lock_buffer();
        buffer.push(record);
        if buffer.len() >= self.batch_size {
            self.flush_locked(&mut buffer);
        }
    }

    /// Drain any buffered records regardless of the threshold. Called by the
    /// driver at end of run so below-threshold remainders are not lost.
    pub fn flush(&self) {
        let mut buffer = self.lock_buffer();
        if !buffer.is_empty() {
            self.flush_locked(&mut buffer);
        }
    }

    /// Number of records currently buffered (not yet durable).
    pub fn buffered_len(&self) -> usize {
        self.lock_buffer().len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_buffer(&self) -> MutexGuard<'_, Vec<OutcomeRecord>> {
        // A poisoned lock means a panic mid-push or mid-flush; the buffer is
        // still a valid Vec, so keep writing rather than losing the run.
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn flush_locked(&self, buffer: &mut Vec<OutcomeRecord>) {
        let written = (|| -> std::io::Result<()> {
            let file = OpenOptions::new().append(true).create(true).open(&self.path)?;
            let mut out = BufWriter::new(file);
            for record in buffer.iter() {
                writeln!(out, "{}", record.to_csv_line())?;
            }
            out.flush()
        })();

        if let Err(e) = written {
            tracing::error!(
                path = %self.path.display(),
                dropped = buffer.len(),
                "failed to persist outcome batch: {e}"
            );
        }
        buffer.clear();
    }
}

/// Read a durable outcome log back for post-run analysis. A malformed line
/// is an error for this consumer (it never was for the writer).
pub fn read_outcome_log(path: &Path) -> Result<Vec<OutcomeRecord>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        LoadburstError::Persistence(format!("cannot read {}: {e}", path.display()))
    })?;

    contents
        .lines()
        .enumerate()
        .map(|(index, line)| OutcomeRecord::parse_csv_line(line, index + 1))
        .collect()
}

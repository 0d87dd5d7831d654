//! Append-only match record sinks.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::record::MatchRecord;

/// An append-only destination for match records.
///
/// Implementations must write each record as one unbroken operation so that
/// records from the owning session never interleave. A sink instance is owned
/// exclusively by one session's worker; sharing a destination across sessions
/// requires an externally synchronized implementation.
pub trait RecordSink: Send {
    /// Appends one formatted record.
    fn append(&mut self, record: &MatchRecord) -> std::io::Result<()>;
}

/// File-backed sink writing newline-terminated record lines.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Opens (or creates) the sink file for append.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// The sink file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for FileSink {
    fn append(&mut self, record: &MatchRecord) -> std::io::Result<()> {
        // One write plus flush per record keeps the line unbroken on disk.
        self.writer.write_all(&record.to_line())?;
        self.writer.flush()
    }
}

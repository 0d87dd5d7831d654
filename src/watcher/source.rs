//! Watched source files.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// One watched source file with its incremental read cursor.
///
/// The cursor starts at the file size at open time, so content that existed
/// before the session started is never scanned. It only ever advances, and
/// only by bytes actually read.
#[derive(Debug)]
pub struct WatchedSource {
    path: PathBuf,
    file: File,
    cursor: u64,
}

impl WatchedSource {
    /// Opens a source read-only with the cursor at the current end of file.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let file = File::open(&path)?;
        let cursor = file.metadata()?.len();
        Ok(Self { path, file, cursor })
    }

    /// The source file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current read cursor, in bytes from the start of the file.
    #[must_use]
    pub const fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Reads up to `chunk_size` newly appended bytes at the cursor.
    ///
    /// Returns an empty chunk when the file has not grown past the cursor.
    /// On success the cursor advances by the bytes actually read; on failure
    /// it is left unchanged, so the same bytes are retried next iteration.
    pub fn poll_chunk(&mut self, chunk_size: usize) -> std::io::Result<Vec<u8>> {
        let size = self.file.metadata()?.len();
        if size <= self.cursor {
            return Ok(Vec::new());
        }

        let to_read = (size - self.cursor).min(chunk_size as u64) as usize;
        let mut chunk = vec![0u8; to_read];

        self.file.seek(SeekFrom::Start(self.cursor))?;
        let read = self.file.read(&mut chunk)?;
        chunk.truncate(read);
        self.cursor += read as u64;

        Ok(chunk)
    }
}

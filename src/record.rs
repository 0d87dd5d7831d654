//! Match records written to the sink.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single keyword match detected by a session's worker.
///
/// The matched window holds the bytes scanned in the triggering read, not an
/// extracted line. It may contain arbitrary bytes, including newlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Path of the source the match was found in.
    pub source_path: PathBuf,

    /// The keyword the session watches for.
    pub keyword: String,

    /// The bytes scanned in the triggering read.
    pub matched_window: Vec<u8>,

    /// When the match was detected.
    pub timestamp: DateTime<Utc>,
}

impl MatchRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(
        source_path: impl Into<PathBuf>,
        keyword: impl Into<String>,
        matched_window: Vec<u8>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            keyword: keyword.into(),
            matched_window,
            timestamp: Utc::now(),
        }
    }

    /// Renders the newline-terminated sink line for this record.
    ///
    /// The format is byte-oriented: the matched window is embedded as-is, and
    /// embedded newlines are not escaped.
    ///
    /// ```text
    /// <source_path> - keyword '<keyword>' found in log '<matched_window>'
    /// ```
    #[must_use]
    pub fn to_line(&self) -> Vec<u8> {
        let path = self.source_path.to_string_lossy();
        let mut line = Vec::with_capacity(
            path.len() + self.keyword.len() + self.matched_window.len() + 32,
        );
        line.extend_from_slice(path.as_bytes());
        line.extend_from_slice(b" - keyword '");
        line.extend_from_slice(self.keyword.as_bytes());
        line.extend_from_slice(b"' found in log '");
        line.extend_from_slice(&self.matched_window);
        line.extend_from_slice(b"'\n");
        line
    }
}

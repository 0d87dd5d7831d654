//! Watcher internals: per-session scan loop, sources, and keyword scanning.

/// Keyword containment scan over read chunks.
pub mod scanner;
/// Watched source files with incremental read cursors.
pub mod source;

pub(crate) mod worker;

pub use scanner::contains_keyword;
pub use source::WatchedSource;

pub(crate) use worker::WatcherWorker;

//! # tailwatch - multi-session log monitoring
//!
//! tailwatch tails a set of files for a keyword and appends a match record to
//! an append-only sink whenever newly appended content contains it. Each
//! monitoring request is an independent session with its own background
//! worker; many sessions run concurrently and each can be stopped on demand
//! with exactly-once teardown.
//!
//! ## Core Concepts
//!
//! - **Session**: one independent request to watch a set of files for a keyword
//! - **Cursor**: last-read byte offset into a watched source; advances monotonically
//! - **Sink**: append-only destination receiving match records
//! - **Worker**: background thread executing the poll-scan-write loop for one session
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tailwatch::WatchService;
//!
//! let service = WatchService::new();
//!
//! // Watch /var/log/app.log for "ERROR", recording matches in matches.log.
//! let id = service.start(&["/var/log/app.log"], "/var/log/matches.log", "ERROR")?;
//!
//! // ... the session's worker polls in the background ...
//!
//! service.stop(id)?;
//! ```
//!
//! Only content appended after a session starts is scanned; a keyword
//! occurrence split across two read chunks is not detected.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod record;
pub mod service;
pub mod session;
pub mod sink;
pub mod watcher;

// Re-export primary types at crate root for convenience
pub use config::WatchConfig;
pub use error::{ValidationError, WatchError, WatchResult};
pub use record::MatchRecord;
pub use service::WatchService;
pub use session::{SessionId, SessionRegistry};
pub use sink::{FileSink, RecordSink};
pub use watcher::WatchedSource;

//! Session identity and the process-wide registry.

/// Registry of live sessions.
pub mod registry;

pub use registry::SessionRegistry;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

/// Unique identifier for a monitoring session.
///
/// Ids are allocated from a monotonic counter and are never reused for the
/// lifetime of the process, even after the originating session is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// Wraps a raw id value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a live session, held by the registry.
///
/// The session's keyword, sources, cursors, and sink are owned exclusively by
/// its worker thread. The handle carries only what `stop` needs: the stop
/// flag, the wake-up channel, and the worker join handle.
#[derive(Debug)]
pub struct SessionHandle {
    stop: Arc<AtomicBool>,
    stop_tx: Sender<()>,
    worker: JoinHandle<()>,
}

impl SessionHandle {
    pub(crate) fn new(stop: Arc<AtomicBool>, stop_tx: Sender<()>, worker: JoinHandle<()>) -> Self {
        Self {
            stop,
            stop_tx,
            worker,
        }
    }

    /// Sets the stop flag and wakes the worker without waiting out its poll
    /// interval. Idempotent and non-blocking.
    pub(crate) fn signal_stop(&self) {
        self.stop.store(true, Ordering::Release);
        let _ = self.stop_tx.try_send(());
    }

    /// Waits for the worker thread to exit.
    pub(crate) fn join(self) -> std::thread::Result<()> {
        self.worker.join()
    }
}

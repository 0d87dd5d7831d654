//! Per-session watcher worker.
//!
//! One worker thread runs per session. Each iteration scans the session's
//! sources in registration order, writes a record for every chunk containing
//! the keyword, then parks in a cancellable timed wait on the stop channel.
//! A read or write failure on one source is recovered locally; it never ends
//! the session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::warn;

use crate::record::MatchRecord;
use crate::session::SessionId;
use crate::sink::RecordSink;

use super::scanner::contains_keyword;
use super::source::WatchedSource;

pub(crate) struct WatcherWorker {
    id: SessionId,
    keyword: String,
    sources: Vec<WatchedSource>,
    sink: Box<dyn RecordSink>,
    chunk_size: usize,
    poll_interval: Duration,
    stop: Arc<AtomicBool>,
    stop_rx: Receiver<()>,
}

impl WatcherWorker {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: SessionId,
        keyword: String,
        sources: Vec<WatchedSource>,
        sink: Box<dyn RecordSink>,
        chunk_size: usize,
        poll_interval: Duration,
        stop: Arc<AtomicBool>,
        stop_rx: Receiver<()>,
    ) -> Self {
        Self {
            id,
            keyword,
            sources,
            sink,
            chunk_size,
            poll_interval,
            stop,
            stop_rx,
        }
    }

    /// Spawns the worker on its own named thread.
    pub(crate) fn spawn(self) -> JoinHandle<()> {
        thread::Builder::new()
            .name(format!("tailwatch-session-{}", self.id))
            .spawn(move || self.run())
            .expect("failed to spawn tailwatch worker")
    }

    fn run(mut self) {
        while !self.stop.load(Ordering::Acquire) {
            self.scan_sources();

            match self.stop_rx.recv_timeout(self.poll_interval) {
                // Stop requested, or every sender is gone: exit now rather
                // than waiting out the interval.
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
        // Sources and sink close here, on the single exit path.
    }

    fn scan_sources(&mut self) {
        for source in &mut self.sources {
            let chunk = match source.poll_chunk(self.chunk_size) {
                Ok(chunk) => chunk,
                Err(err) => {
                    // Skip this source for this iteration only; the cursor is
                    // unchanged, so the bytes are retried next time around.
                    warn!(
                        "session {}: read failed on {}: {err}",
                        self.id,
                        source.path().display()
                    );
                    continue;
                }
            };

            if chunk.is_empty() || !contains_keyword(&chunk, self.keyword.as_bytes()) {
                continue;
            }

            let record = MatchRecord::new(source.path(), self.keyword.clone(), chunk);
            if let Err(err) = self.sink.append(&record) {
                warn!(
                    "session {}: sink write failed for {}: {err}",
                    self.id,
                    source.path().display()
                );
            }
        }
    }
}

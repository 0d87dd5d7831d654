//! Control surface: session start and stop.
//!
//! `start` follows a strict order: validate arguments, open every source,
//! open the sink, allocate an id, spawn the worker, register it. A failure
//! before registration releases everything already opened by drop and
//! consumes no id. `stop` removes the session atomically, signals its worker,
//! and joins it before returning.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crossbeam_channel::bounded;
use log::{debug, warn};

use crate::config::WatchConfig;
use crate::error::{ValidationError, WatchError, WatchResult};
use crate::session::{SessionHandle, SessionId, SessionRegistry};
use crate::sink::{FileSink, RecordSink};
use crate::watcher::{WatchedSource, WatcherWorker};

/// Multi-session log monitoring service.
///
/// Each `start` call creates an independent session with its own worker
/// thread; sessions share nothing but the registry. Dropping the service
/// stops every live session deterministically.
pub struct WatchService {
    registry: SessionRegistry,
    config: WatchConfig,
}

impl WatchService {
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WatchConfig::default())
    }

    /// Creates a service with a custom configuration.
    #[must_use]
    pub fn with_config(config: WatchConfig) -> Self {
        Self {
            registry: SessionRegistry::new(),
            config,
        }
    }

    /// The service configuration.
    #[must_use]
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Starts a session watching `sources` for `keyword`, appending match
    /// records to the file at `sink_path` (created if absent).
    ///
    /// Content already present in a source when it is opened is never
    /// scanned; only later appends are. On any failure no resource stays
    /// open, no id is consumed, and the registry is unchanged.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] for argument-shape failures, `TooManySources` when
    /// the source list exceeds the configured limit, `SourceNotFound` for a
    /// missing source, `Io` for any other open failure.
    pub fn start<P: AsRef<Path>>(
        &self,
        sources: &[P],
        sink_path: impl AsRef<Path>,
        keyword: impl Into<String>,
    ) -> WatchResult<SessionId> {
        let sink_path = sink_path.as_ref();
        let keyword = keyword.into();
        self.validate(sources.len(), &keyword)?;

        let watched = self.open_sources(sources)?;

        // Sink opens last: a source failure above must not create the sink file.
        let sink = FileSink::open(sink_path).map_err(|err| WatchError::io(sink_path, err))?;

        Ok(self.spawn_session(watched, Box::new(sink), keyword))
    }

    /// Starts a session writing records to a caller-supplied sink.
    ///
    /// This is the seam for sharing one destination across sessions: the
    /// service itself serializes records only within a session, so a shared
    /// sink implementation must synchronize externally.
    ///
    /// # Errors
    ///
    /// Same as [`WatchService::start`], minus sink-open failures.
    pub fn start_with_sink<P: AsRef<Path>>(
        &self,
        sources: &[P],
        sink: Box<dyn RecordSink>,
        keyword: impl Into<String>,
    ) -> WatchResult<SessionId> {
        let keyword = keyword.into();
        self.validate(sources.len(), &keyword)?;
        let watched = self.open_sources(sources)?;
        Ok(self.spawn_session(watched, sink, keyword))
    }

    /// Stops the session with the given id and waits for its worker to exit.
    ///
    /// Once this returns, the id never resolves again, no further sink writes
    /// occur for the session, and all its resources are released. A second
    /// call with the same id returns `SessionNotFound`.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` for an unknown (or already stopped) id;
    /// `WorkerPanicked` if the worker thread did not exit cleanly.
    pub fn stop(&self, id: SessionId) -> WatchResult<()> {
        // Atomic lookup-and-remove: a concurrent or repeated stop on the same
        // id fails here instead of double-releasing.
        let handle = self
            .registry
            .remove(id)
            .ok_or(WatchError::SessionNotFound { id })?;

        handle.signal_stop();
        handle
            .join()
            .map_err(|_| WatchError::WorkerPanicked { id })?;

        debug!("session {id} stopped");
        Ok(())
    }

    /// Stops every live session, joining each worker in turn.
    pub fn stop_all(&self) {
        for id in self.registry.ids() {
            match self.stop(id) {
                Ok(()) => {}
                // Raced with a concurrent stop; nothing left to release.
                Err(WatchError::SessionNotFound { .. }) => {}
                Err(err) => warn!("failed to stop session {id}: {err}"),
            }
        }
    }

    /// Returns true if `id` resolves to a live session.
    #[must_use]
    pub fn is_running(&self, id: SessionId) -> bool {
        self.registry.contains(id)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    /// Snapshot of live session ids, in ascending order.
    #[must_use]
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.registry.ids()
    }

    fn validate(&self, source_count: usize, keyword: &str) -> WatchResult<()> {
        if source_count == 0 {
            return Err(ValidationError::NoSources.into());
        }
        if source_count > self.config.max_sources {
            return Err(WatchError::TooManySources {
                count: source_count,
                max: self.config.max_sources,
            });
        }
        if keyword.is_empty() {
            return Err(ValidationError::EmptyKeyword.into());
        }
        if keyword.len() > self.config.max_keyword_len {
            return Err(ValidationError::KeywordTooLong {
                len: keyword.len(),
                max: self.config.max_keyword_len,
            }
            .into());
        }
        Ok(())
    }

    // Opens each source read-only, in order. The first failure aborts; the
    // handles opened so far are released by drop.
    fn open_sources<P: AsRef<Path>>(&self, sources: &[P]) -> WatchResult<Vec<WatchedSource>> {
        let mut watched = Vec::with_capacity(sources.len());
        for path in sources {
            let path = path.as_ref();
            let source = WatchedSource::open(path).map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    WatchError::SourceNotFound {
                        path: path.to_path_buf(),
                    }
                } else {
                    WatchError::io(path, err)
                }
            })?;
            watched.push(source);
        }
        Ok(watched)
    }

    // All resources are open at this point; nothing below can fail, so the
    // allocated id is always returned to the caller.
    fn spawn_session(
        &self,
        sources: Vec<WatchedSource>,
        sink: Box<dyn RecordSink>,
        keyword: String,
    ) -> SessionId {
        let id = self.registry.allocate_id();
        let stop = Arc::new(AtomicBool::new(false));
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let worker = WatcherWorker::new(
            id,
            keyword,
            sources,
            sink,
            self.config.chunk_size,
            self.config.poll_interval,
            Arc::clone(&stop),
            stop_rx,
        );
        let join = worker.spawn();

        self.registry.insert(id, SessionHandle::new(stop, stop_tx, join));
        debug!("session {id} started");
        id
    }
}

impl Default for WatchService {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for WatchService {
    fn drop(&mut self) {
        // Deterministic shutdown: no worker outlives the service.
        self.stop_all();
    }
}

//! Per-mode session bookkeeping.
//!
//! The registry is the only owner of session state and of the result cache. Each mode's record
//! sits behind its own mutex, so a submission and a callback for the same mode serialize while
//! different modes never contend.
//!
//! A callback is admitted only when its version equals the mode's current version and the
//! session is still running. Anything else is stale and dropped without a trace to the consumer:
//! an older version, a version that was cancelled, or a callback after the terminal marker.
//!
//! A combined submission also starts its viewport half as the next viewport version. When the
//! combined list completes normally, the latest viewport job is poked: it runs again under a
//! fresh viewport version so the map agrees with the list.

use std::{
    array,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crossbeam_channel::Sender;
use tracing::{debug, trace};

use crate::{
    CacheError, EndStatus, ResultCache, Retrieval, SearchJob, SearchMode, SearchResult,
    SessionError, SessionEvent, StampedUpdate, Update,
};

/// Lifecycle of a mode's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing has been submitted.
    Idle,
    /// A search is in flight.
    Running,
    /// The terminal marker was delivered.
    Completed,
    /// The session was cancelled before it completed.
    Cancelled,
}

/// Bookkeeping for one mode.
#[derive(Debug)]
struct Session {
    /// Version of the latest accepted submission; 0 before the first.
    version: u64,
    /// Lifecycle state.
    state: SessionState,
    /// Query text of the latest accepted submission.
    query: String,
    /// Results admitted for the current version.
    accumulator: Vec<SearchResult>,
    /// Latest accepted job, kept for re-running.
    latest: Option<SearchJob>,
}

impl Session {
    /// An idle session.
    fn idle() -> Self {
        Self {
            version: 0,
            state: SessionState::Idle,
            query: String::new(),
            accumulator: Vec::new(),
            latest: None,
        }
    }

    /// Makes `job` the running search.
    fn accept(&mut self, job: SearchJob) {
        self.version = job.version;
        self.state = SessionState::Running;
        self.query.clone_from(&job.query);
        self.accumulator.clear();
        self.latest = Some(job);
    }

    /// Whether a callback stamped with `version` may reach the consumer.
    fn admits(&self, version: u64) -> bool {
        self.state == SessionState::Running && self.version == version
    }
}

/// Owns every mode's session and the shared result cache.
pub struct SessionRegistry {
    /// One record per mode, indexed by `SearchMode::index`.
    sessions: [Mutex<Session>; SearchMode::ALL.len()],
    /// Latest list results.
    cache: Mutex<ResultCache>,
    /// Backend that runs searches.
    retrieval: Arc<dyn Retrieval>,
    /// Consumer channel.
    events: Sender<SessionEvent>,
}

impl SessionRegistry {
    /// Creates a registry with every mode idle.
    pub fn new(retrieval: Arc<dyn Retrieval>, events: Sender<SessionEvent>) -> Self {
        Self {
            sessions: array::from_fn(|_| Mutex::new(Session::idle())),
            cache: Mutex::new(ResultCache::default()),
            retrieval,
            events,
        }
    }

    /// Registers `job` as the mode's session and starts it.
    ///
    /// The version must be newer than the mode's current version. If the retrieval layer cannot
    /// start, nothing changes and the previous session keeps its version and state.
    ///
    /// A combined job first starts its viewport half. If that half cannot start, the combined
    /// job is not started either.
    pub fn submit(&self, job: SearchJob) -> Result<(), SessionError> {
        let mode = job.mode;
        let version = job.version;

        let mut session = self.session(mode);
        if version <= session.version {
            return Err(SessionError::OutdatedVersion {
                mode,
                version,
                current: session.version,
            });
        }

        // Registered while the combined lock is held: the combined completion must find it.
        if mode == SearchMode::Combined {
            let mut viewport = self.session(SearchMode::Viewport);
            let half = job.restamped(SearchMode::Viewport, viewport.version + 1);
            self.start(&mut viewport, half)?;
        }

        // The lock stays held across the start: no callback for `version` may be judged before
        // the version is registered.
        self.start(&mut session, job)
    }

    /// Starts `job` and makes it the session's running search.
    fn start(&self, session: &mut Session, job: SearchJob) -> Result<(), SessionError> {
        let mode = job.mode;
        let version = job.version;
        if !self.retrieval.start_search(job.clone()) {
            debug!(%mode, version, "retrieval refused to start");
            return Err(SessionError::StartFailure { mode });
        }

        session.accept(job);
        debug!(%mode, version, query = %session.query, "search submitted");
        Ok(())
    }

    /// Applies a batch of partial results. Returns whether it reached the consumer.
    pub fn on_partial_results(
        &self,
        mode: SearchMode,
        version: u64,
        results: Vec<SearchResult>,
    ) -> bool {
        let mut session = self.session(mode);
        if !session.admits(version) {
            trace!(%mode, version, current = session.version, "dropping stale results");
            return false;
        }

        session.accumulator.extend(results.iter().cloned());
        if mode.is_list_mode() {
            self.cache().store(session.accumulator.clone(), version);
        }

        // Emitted while locked: a cancel must not land between admission and delivery.
        self.emit(SessionEvent::Update {
            mode,
            version,
            results,
        });
        true
    }

    /// Applies a terminal marker. Returns whether it reached the consumer.
    ///
    /// Completing a combined search normally pokes the viewport search once, before the marker
    /// is forwarded.
    pub fn on_completed(&self, mode: SearchMode, version: u64, status: EndStatus) -> bool {
        {
            let mut session = self.session(mode);
            if !session.admits(version) {
                trace!(%mode, version, current = session.version, "dropping stale end marker");
                return false;
            }

            session.state = SessionState::Completed;
            debug!(
                %mode,
                version,
                results = session.accumulator.len(),
                ?status,
                "search completed"
            );
        }

        if mode == SearchMode::Combined && status == EndStatus::Normal {
            self.poke_viewport();
        }
        self.emit(SessionEvent::End {
            mode,
            version,
            status,
        });
        true
    }

    /// Routes a stamped update to the matching callback.
    pub fn apply(&self, stamped: StampedUpdate) -> bool {
        match stamped.update {
            Update::Batch(results) => {
                self.on_partial_results(stamped.mode, stamped.version, results)
            }
            Update::End(status) => self.on_completed(stamped.mode, stamped.version, status),
        }
    }

    /// Cancels the mode's running session and asks the retrieval layer to stop.
    ///
    /// Later callbacks for the cancelled version are dropped. The stop request is sent even if
    /// nothing is running.
    pub fn cancel(&self, mode: SearchMode) {
        let mut session = self.session(mode);
        if session.state == SessionState::Running {
            session.state = SessionState::Cancelled;
            debug!(%mode, version = session.version, "search cancelled");
        }
        // Stopped under the lock: stops are keyed by mode, so a submission slipping in first
        // would lose its own search.
        self.retrieval.stop_search(mode);
    }

    /// Cancels every mode.
    pub fn cancel_all(&self) {
        for mode in SearchMode::ALL {
            self.cancel(mode);
        }
    }

    /// Returns a copy of the cached list result at `index`.
    pub fn cached_result(&self, index: usize) -> Result<SearchResult, CacheError> {
        self.cache().get(index).cloned()
    }

    /// Number of cached list results.
    pub fn cached_len(&self) -> usize {
        self.cache().len()
    }

    /// Lifecycle state of the mode's session.
    pub fn state(&self, mode: SearchMode) -> SessionState {
        self.session(mode).state
    }

    /// Version of the mode's latest accepted submission; 0 if none.
    pub fn current_version(&self, mode: SearchMode) -> u64 {
        self.session(mode).version
    }

    /// Query text of the mode's latest accepted submission.
    pub fn current_query(&self, mode: SearchMode) -> String {
        self.session(mode).query.clone()
    }

    /// Results admitted so far for the mode's current version.
    pub fn accumulated(&self, mode: SearchMode) -> Vec<SearchResult> {
        self.session(mode).accumulator.clone()
    }

    /// Re-runs the latest viewport job under the next viewport version.
    fn poke_viewport(&self) {
        let mode = SearchMode::Viewport;
        let mut session = self.session(mode);
        let next = session.version + 1;
        let Some(job) = session.latest.as_ref().map(|job| job.restamped(mode, next)) else {
            trace!("no viewport search to poke");
            return;
        };

        if self.retrieval.poke_viewport(job.clone()) {
            session.accept(job);
            debug!(version = next, "viewport search poked");
        } else {
            debug!(version = next, "retrieval refused the viewport poke");
        }
    }

    /// Locks the record for `mode`, recovering from poisoning.
    fn session(&self, mode: SearchMode) -> MutexGuard<'_, Session> {
        self.sessions[mode.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the cache, recovering from poisoning.
    fn cache(&self) -> MutexGuard<'_, ResultCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forwards an event to the consumer. A consumer that went away is not an error.
    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            trace!("consumer gone; event discarded");
        }
    }
}

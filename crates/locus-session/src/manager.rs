//! The consumer-facing session manager.
//!
//! Retrieval workers send stamped updates over a channel; a single dispatcher thread drains it
//! and applies the registry's staleness filter, so callbacks for one mode are judged in the order
//! they were produced. Accepted results reach the consumer as [`SessionEvent`]s on a second
//! channel.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use locus_config::{Config, TokenizerSettings};
use locus_match::{CategoryMatcher, Locale};
use locus_query::{Delimiters, slice};
use tracing::{debug, trace, warn};

use crate::{
    CacheError, Retrieval, SearchJob, SearchMode, SearchResult, SessionError, SessionEvent,
    SessionRegistry, SessionState,
    sink::{Dispatch, ResultSink},
};

/// A query submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Mode to search in.
    pub mode: SearchMode,
    /// Raw query text.
    pub query: String,
    /// Caller-supplied version; must exceed the mode's current version.
    pub version: u64,
    /// Input locale of the query.
    pub locale: Locale,
    /// Whether the query was picked from a category list; disables typo tolerance.
    pub is_category: bool,
    /// Bookmark group to search in; `None` searches every group.
    pub bookmark_group: Option<u64>,
}

impl SearchRequest {
    /// A typed query in `locale`.
    pub fn new(mode: SearchMode, query: impl Into<String>, version: u64, locale: Locale) -> Self {
        Self {
            mode,
            query: query.into(),
            version,
            locale,
            is_category: false,
            bookmark_group: None,
        }
    }

    /// Marks the request as a category pick.
    pub fn category(mut self) -> Self {
        self.is_category = true;
        self
    }

    /// Limits a bookmark search to one group. Other modes ignore it.
    pub fn in_group(mut self, group: u64) -> Self {
        self.bookmark_group = Some(group);
        self
    }
}

/// Settings the manager takes from configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Delimiters for slicing queries.
    pub tokenizer: TokenizerSettings,
    /// Disable typo tolerance for every query.
    pub exact_only: bool,
    /// Capacity of the retrieval channel; 0 means unbounded.
    pub channel_capacity: usize,
}

impl SessionOptions {
    /// Extracts the session-relevant parts of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            tokenizer: config.tokenizer.clone(),
            exact_only: config.matching.exact_only,
            channel_capacity: config.session.channel_capacity,
        }
    }
}

/// Runs versioned, cancellable searches against a retrieval backend.
///
/// Dropping the manager stops the dispatcher; later callbacks from retrieval workers fail to
/// send and are lost.
pub struct SessionManager {
    /// Session state and result cache.
    registry: Arc<SessionRegistry>,
    /// Category resolution for submitted queries.
    matcher: Arc<CategoryMatcher>,
    /// Slicing and matching options.
    options: SessionOptions,
    /// Sending half handed to retrieval workers via `ResultSink`.
    dispatch_tx: Sender<Dispatch>,
    /// Consumer events.
    events: Receiver<SessionEvent>,
    /// Dispatcher thread.
    dispatcher: Option<JoinHandle<()>>,
}

impl SessionManager {
    /// Creates a manager and starts its dispatcher thread.
    pub fn new(
        matcher: Arc<CategoryMatcher>,
        retrieval: Arc<dyn Retrieval>,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let (events_tx, events) = unbounded();
        let (dispatch_tx, dispatch_rx) = if options.channel_capacity == 0 {
            unbounded()
        } else {
            bounded(options.channel_capacity)
        };

        let registry = Arc::new(SessionRegistry::new(retrieval, events_tx));
        let worker_registry = Arc::clone(&registry);
        let dispatcher = thread::Builder::new()
            .name("locus-dispatch".into())
            .spawn(move || dispatch(&worker_registry, &dispatch_rx))?;

        Ok(Self {
            registry,
            matcher,
            options,
            dispatch_tx,
            events,
            dispatcher: Some(dispatcher),
        })
    }

    /// Submits a query.
    ///
    /// The query is sliced with the locale's delimiters and its categories are resolved in the
    /// request locale and the default locale before the retrieval layer is started. A combined
    /// query also starts a viewport search under the next viewport version.
    pub fn submit_query(&self, request: SearchRequest) -> Result<(), SessionError> {
        let delimiters = Delimiters::default().with_extra(
            &self
                .options
                .tokenizer
                .extra_delimiters_for(request.locale.as_str()),
        );
        let tokens = slice(&request.query, &delimiters);

        let mut locales = vec![request.locale.clone()];
        if !locales.contains(self.matcher.default_locale()) {
            locales.push(self.matcher.default_locale().clone());
        }

        let exact_only = self.options.exact_only || request.is_category;
        let categories = self.matcher.category_matches(&tokens, &locales, exact_only);
        trace!(
            mode = %request.mode,
            tokens = tokens.len(),
            categories = categories.len(),
            "resolved query"
        );

        let job = SearchJob {
            mode: request.mode,
            version: request.version,
            sink: ResultSink::new(request.mode, request.version, self.dispatch_tx.clone()),
            query: request.query,
            tokens,
            categories,
            locales,
            is_category: request.is_category,
            bookmark_group: request.bookmark_group,
        };
        self.registry.submit(job)
    }

    /// Submits a typed query in the default locale. Returns whether it was accepted.
    pub fn submit(&self, mode: SearchMode, query: &str, version: u64) -> bool {
        let locale = self.matcher.default_locale().clone();
        let request = SearchRequest::new(mode, query, version, locale);
        match self.submit_query(request) {
            Ok(()) => true,
            Err(err) => {
                debug!(%mode, version, "submission rejected: {err}");
                false
            }
        }
    }

    /// Cancels the mode's session.
    pub fn cancel(&self, mode: SearchMode) {
        self.registry.cancel(mode);
    }

    /// Cancels every mode.
    pub fn cancel_all(&self) {
        self.registry.cancel_all();
    }

    /// Returns the cached list result at `index`, for re-selecting an item already shown.
    pub fn cached_result(&self, index: usize) -> Result<SearchResult, CacheError> {
        self.registry.cached_result(index)
    }

    /// Lifecycle state of the mode's session.
    pub fn state(&self, mode: SearchMode) -> SessionState {
        self.registry.state(mode)
    }

    /// Version of the mode's latest accepted submission.
    pub fn current_version(&self, mode: SearchMode) -> u64 {
        self.registry.current_version(mode)
    }

    /// Consumer events, in delivery order.
    pub fn events(&self) -> &Receiver<SessionEvent> {
        &self.events
    }

    /// The underlying registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if self.dispatch_tx.send(Dispatch::Shutdown).is_err() {
            warn!("session dispatcher already stopped");
        }
        if let Some(handle) = self.dispatcher.take()
            && handle.join().is_err()
        {
            warn!("session dispatcher panicked");
        }
    }
}

/// Dispatcher loop: applies updates until shutdown.
fn dispatch(registry: &SessionRegistry, rx: &Receiver<Dispatch>) {
    for message in rx {
        match message {
            Dispatch::Update(stamped) => {
                registry.apply(stamped);
            }
            Dispatch::Shutdown => break,
        }
    }
    debug!("session dispatcher stopped");
}

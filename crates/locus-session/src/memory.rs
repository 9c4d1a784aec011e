//! An in-memory retrieval backend.
//!
//! Serves features, downloadable regions and bookmarks loaded from a TOML places file:
//!
//! ```toml
//! [[feature]]
//! id = 1
//! name = "Blue Bottle Coffee"
//! type_id = 1
//! point = { lat = 37.78, lon = -122.41 }
//! in_viewport = true
//!
//! [[region]]
//! country_id = "Germany_Berlin"
//! name = "Berlin"
//!
//! [[bookmark]]
//! id = 7
//! name = "Home"
//! group = 1
//! ```
//!
//! Each search runs on its own worker thread and streams fixed-size batches, checking for
//! cancellation between them.

use std::{
    collections::{BTreeSet, HashMap},
    fs,
    ops::Range,
    path::Path,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use locus_match::TypeId;
use locus_query::{Delimiters, TokenSlice, slice};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::{
    CancellationHandle, CancellationToken, EndStatus, PlacesError, Point, Retrieval, SearchJob,
    SearchMode, SearchResult, cancellation_pair,
};

/// Results per batch when none is configured.
const DEFAULT_BATCH_SIZE: usize = 16;

/// A map feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    /// Feature identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Category, if known.
    #[serde(default)]
    pub type_id: Option<TypeId>,
    /// Location, if known.
    #[serde(default)]
    pub point: Option<Point>,
    /// Whether the feature is inside the current map viewport.
    #[serde(default)]
    pub in_viewport: bool,
}

/// A downloadable map region.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Region {
    /// Region identifier.
    pub country_id: String,
    /// Display name.
    pub name: String,
}

/// A saved bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bookmark {
    /// Bookmark identifier.
    pub id: u64,
    /// Bookmark title.
    pub name: String,
    /// Group the bookmark belongs to, if any.
    #[serde(default)]
    pub group: Option<u64>,
}

/// Everything the in-memory backend can find.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Places {
    /// Map features.
    #[serde(default, rename = "feature")]
    pub features: Vec<Feature>,
    /// Downloadable regions.
    #[serde(default, rename = "region")]
    pub regions: Vec<Region>,
    /// Bookmarks.
    #[serde(default, rename = "bookmark")]
    pub bookmarks: Vec<Bookmark>,
}

impl Places {
    /// Loads places from a TOML file.
    pub fn load(path: &Path) -> Result<Self, PlacesError> {
        let contents = fs::read_to_string(path).map_err(|source| PlacesError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| PlacesError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Retrieval backend over a fixed set of [`Places`].
pub struct MemoryRetrieval {
    /// Searchable data.
    places: Arc<Places>,
    /// Results per batch.
    batch_size: usize,
    /// Pause between batches, to make interleavings observable.
    batch_delay: Option<Duration>,
    /// Whether searches may start.
    ready: AtomicBool,
    /// Stop handles of the latest search per mode.
    active: Mutex<HashMap<SearchMode, CancellationHandle>>,
    /// Viewport reconciliations requested so far.
    pokes: AtomicUsize,
}

impl MemoryRetrieval {
    /// Creates a ready backend.
    pub fn new(places: Places) -> Self {
        Self {
            places: Arc::new(places),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: None,
            ready: AtomicBool::new(true),
            active: Mutex::new(HashMap::new()),
            pokes: AtomicUsize::new(0),
        }
    }

    /// Sets the number of results per batch (at least one).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Sleeps between batches.
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = Some(delay);
        self
    }

    /// Marks the backend ready or not; searches fail to start while it is not.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Number of viewport reconciliations requested.
    pub fn pokes(&self) -> usize {
        self.pokes.load(Ordering::SeqCst)
    }

    /// Locks the handle table, recovering from poisoning.
    fn active(&self) -> MutexGuard<'_, HashMap<SearchMode, CancellationHandle>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Retrieval for MemoryRetrieval {
    fn start_search(&self, job: SearchJob) -> bool {
        if !self.ready.load(Ordering::SeqCst) {
            return false;
        }

        let (token, handle) = cancellation_pair();
        let worker = Worker {
            places: Arc::clone(&self.places),
            batch_size: self.batch_size,
            batch_delay: self.batch_delay,
            token,
        };
        let name = format!("locus-{}-{}", job.mode, job.version);
        let mode = job.mode;
        if thread::Builder::new()
            .name(name)
            .spawn(move || worker.run(&job))
            .is_err()
        {
            return false;
        }

        if let Some(previous) = self.active().insert(mode, handle) {
            previous.cancel();
        }
        true
    }

    fn stop_search(&self, mode: SearchMode) {
        if let Some(handle) = self.active().remove(&mode) {
            handle.cancel();
        }
    }

    fn poke_viewport(&self, job: SearchJob) -> bool {
        let pokes = self.pokes.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(pokes, version = job.version, "viewport search poked");
        self.start_search(job)
    }
}

/// State moved onto a search thread.
struct Worker {
    /// Searchable data.
    places: Arc<Places>,
    /// Results per batch.
    batch_size: usize,
    /// Pause between batches.
    batch_delay: Option<Duration>,
    /// Stop flag for this search.
    token: CancellationToken,
}

impl Worker {
    /// Finds matches for `job` and streams them through its sink.
    fn run(&self, job: &SearchJob) {
        let results = self.find(job);
        trace!(
            mode = %job.mode,
            version = job.version,
            found = results.len(),
            "memory search"
        );

        for batch in results.chunks(self.batch_size) {
            if let Some(delay) = self.batch_delay {
                thread::sleep(delay);
            }
            if self.token.is_cancelled() {
                job.sink.end(EndStatus::Interrupted);
                return;
            }
            if !job.sink.send_batch(batch.to_vec()) {
                return;
            }
        }
        job.sink.end(EndStatus::Normal);
    }

    /// All results for `job`, in list order.
    fn find(&self, job: &SearchJob) -> Vec<SearchResult> {
        if job.tokens.is_empty() {
            return Vec::new();
        }
        let query = QueryMatcher::new(job);

        match job.mode {
            SearchMode::Everywhere | SearchMode::Combined | SearchMode::Viewport => self
                .places
                .features
                .iter()
                .filter(|f| job.mode != SearchMode::Viewport || f.in_viewport)
                .filter_map(|f| {
                    query
                        .feature_highlights(f)
                        .map(|highlights| SearchResult::Feature {
                            id: f.id,
                            name: f.name.clone(),
                            type_id: f.type_id,
                            point: f.point,
                            highlights,
                        })
                })
                .collect(),
            SearchMode::Downloader => self
                .places
                .regions
                .iter()
                .filter(|r| query.name_highlights(&r.name).is_some())
                .map(|r| SearchResult::Region {
                    country_id: r.country_id.clone(),
                    matched_name: r.name.clone(),
                })
                .collect(),
            SearchMode::Bookmarks => self
                .places
                .bookmarks
                .iter()
                .filter(|b| job.bookmark_group.is_none_or(|group| b.group == Some(group)))
                .filter(|b| query.name_highlights(&b.name).is_some())
                .map(|b| SearchResult::Bookmark {
                    id: b.id,
                    name: b.name.clone(),
                })
                .collect(),
        }
    }
}

/// Matches names against a job's tokens and resolved categories.
struct QueryMatcher<'a> {
    /// Query tokens.
    tokens: &'a TokenSlice,
    /// Categories resolved per token index.
    categories: HashMap<usize, BTreeSet<TypeId>>,
    /// Whether only the category filter applies.
    is_category: bool,
}

impl<'a> QueryMatcher<'a> {
    /// Indexes the job's category matches by token.
    fn new(job: &'a SearchJob) -> Self {
        let mut categories: HashMap<usize, BTreeSet<TypeId>> = HashMap::new();
        for m in &job.categories {
            categories.entry(m.token_index).or_default().insert(m.type_id);
        }
        Self {
            tokens: &job.tokens,
            categories,
            is_category: job.is_category,
        }
    }

    /// Highlights for a feature, or `None` if it does not match.
    ///
    /// A token matches through the name or, failing that, through the feature's category. A
    /// category pick matches on category alone.
    fn feature_highlights(&self, feature: &Feature) -> Option<Vec<Range<usize>>> {
        let in_category = |index: usize| {
            feature.type_id.is_some_and(|id| {
                self.categories
                    .get(&index)
                    .is_some_and(|ids| ids.contains(&id))
            })
        };

        if self.is_category {
            return (0..self.tokens.len())
                .any(in_category)
                .then(Vec::new);
        }

        let name_tokens = slice(&feature.name, &Delimiters::default());
        let mut highlights = Vec::new();
        for (index, token) in self.tokens.iter().enumerate() {
            match self.find_in_name(&name_tokens, index, token.text()) {
                Some(range) => highlights.push(range),
                None if in_category(index) => {}
                None => return None,
            }
        }
        Some(highlights)
    }

    /// Highlights for a plain name, or `None` if some token is missing from it.
    fn name_highlights(&self, name: &str) -> Option<Vec<Range<usize>>> {
        let name_tokens = slice(name, &Delimiters::default());
        self.tokens
            .iter()
            .enumerate()
            .map(|(index, token)| self.find_in_name(&name_tokens, index, token.text()))
            .collect()
    }

    /// Range of the first name token equal to the query token, or extending it when the query
    /// token is the last one and may still be typed.
    fn find_in_name(
        &self,
        name_tokens: &TokenSlice,
        index: usize,
        text: &str,
    ) -> Option<Range<usize>> {
        let prefix_ok = self.tokens.last_is_prefix() && index + 1 == self.tokens.len();
        name_tokens
            .iter()
            .find(|n| n.text() == text || (prefix_ok && n.text().starts_with(text)))
            .map(|n| n.range())
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::{Receiver, Sender, unbounded};

    use super::*;
    use crate::{ResultSink, StampedUpdate, Update, sink::Dispatch};

    const PLACES: &str = r#"
[[feature]]
id = 1
name = "Blue Bottle Coffee"
type_id = 1
in_viewport = true

[[feature]]
id = 2
name = "Grand Hotel"
type_id = 3

[[region]]
country_id = "Germany_Berlin"
name = "Berlin"

[[bookmark]]
id = 7
name = "Home"
group = 1

[[bookmark]]
id = 8
name = "Home office"
group = 2
"#;

    #[test]
    fn places_parse() {
        let places: Places = toml::from_str(PLACES).unwrap();
        assert_eq!(places.features.len(), 2);
        assert_eq!(places.features[0].type_id, Some(TypeId(1)));
        assert!(!places.features[1].in_viewport);
        assert_eq!(places.regions[0].name, "Berlin");
        assert_eq!(places.bookmarks[0].id, 7);
        assert_eq!(places.bookmarks[1].group, Some(2));
    }

    #[test]
    fn empty_places_parse() {
        let places: Places = toml::from_str("").unwrap();
        assert_eq!(places, Places::default());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Places::load(Path::new("/nonexistent/places.toml")).unwrap_err();
        assert!(matches!(err, PlacesError::ReadFile { .. }));
    }

    fn job(mode: SearchMode, query: &str, tx: Sender<Dispatch>) -> SearchJob {
        SearchJob {
            mode,
            version: 1,
            query: query.into(),
            tokens: slice(query, &Delimiters::default()),
            categories: Vec::new(),
            locales: Vec::new(),
            is_category: false,
            bookmark_group: None,
            sink: ResultSink::new(mode, 1, tx),
        }
    }

    /// Results of every batch up to the terminal marker, and how it ended.
    fn drain(rx: &Receiver<Dispatch>) -> (Vec<SearchResult>, EndStatus) {
        let mut results = Vec::new();
        loop {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                Dispatch::Update(StampedUpdate {
                    update: Update::Batch(batch),
                    ..
                }) => results.extend(batch),
                Dispatch::Update(StampedUpdate {
                    update: Update::End(status),
                    ..
                }) => return (results, status),
                Dispatch::Shutdown => panic!("unexpected shutdown"),
            }
        }
    }

    fn ids(results: &[SearchResult]) -> Vec<u64> {
        results
            .iter()
            .filter_map(|r| match r {
                SearchResult::Feature { id, .. } | SearchResult::Bookmark { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn not_ready_refuses_to_start() {
        let retrieval = MemoryRetrieval::new(Places::default());
        retrieval.set_ready(false);
        let (tx, _rx) = unbounded();
        assert!(!retrieval.start_search(job(SearchMode::Everywhere, "x", tx)));
    }

    #[test]
    fn poke_reruns_viewport_job() {
        let retrieval = MemoryRetrieval::new(toml::from_str(PLACES).unwrap());
        let (tx, rx) = unbounded();

        assert!(retrieval.poke_viewport(job(SearchMode::Viewport, "blue", tx.clone())));
        let (results, status) = drain(&rx);
        assert_eq!((ids(&results), status), (vec![1], EndStatus::Normal));

        assert!(retrieval.poke_viewport(job(SearchMode::Viewport, "grand", tx)));
        let (results, status) = drain(&rx);
        assert_eq!((ids(&results), status), (vec![], EndStatus::Normal));
        assert_eq!(retrieval.pokes(), 2);
    }

    #[test]
    fn viewport_skips_features_off_screen() {
        let retrieval = MemoryRetrieval::new(toml::from_str(PLACES).unwrap());
        let (tx, rx) = unbounded();

        assert!(retrieval.start_search(job(SearchMode::Everywhere, "grand", tx.clone())));
        assert_eq!(ids(&drain(&rx).0), vec![2]);
        assert!(retrieval.start_search(job(SearchMode::Viewport, "grand", tx)));
        assert!(drain(&rx).0.is_empty());
    }

    #[test]
    fn bookmark_search_honours_group() {
        let retrieval = MemoryRetrieval::new(toml::from_str(PLACES).unwrap());
        let (tx, rx) = unbounded();

        assert!(retrieval.start_search(job(SearchMode::Bookmarks, "home", tx.clone())));
        assert_eq!(ids(&drain(&rx).0), vec![7, 8]);

        let mut scoped = job(SearchMode::Bookmarks, "home", tx.clone());
        scoped.bookmark_group = Some(2);
        assert!(retrieval.start_search(scoped));
        assert_eq!(ids(&drain(&rx).0), vec![8]);

        let mut empty = job(SearchMode::Bookmarks, "home", tx);
        empty.bookmark_group = Some(9);
        assert!(retrieval.start_search(empty));
        assert!(drain(&rx).0.is_empty());
    }

    #[test]
    fn places_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.toml");
        fs::write(&path, PLACES).unwrap();

        let places = Places::load(&path).unwrap();
        assert_eq!(places.features.len(), 2);
    }

    #[test]
    fn places_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.toml");
        fs::write(&path, "[[feature]]\nid = \"one\"\n").unwrap();

        let err = Places::load(&path).unwrap_err();
        assert!(matches!(err, PlacesError::ParseToml { .. }));
        assert!(err.to_string().contains("places.toml"));
    }
}

//! The boundary to the retrieval layer that actually searches the index.

use locus_match::{CategoryMatch, Locale};
use locus_query::TokenSlice;

use crate::{ResultSink, SearchMode};

/// Everything a retrieval implementation needs to run one search.
#[derive(Debug, Clone)]
pub struct SearchJob {
    /// Mode of the search.
    pub mode: SearchMode,
    /// Version stamp of the search.
    pub version: u64,
    /// Raw query text.
    pub query: String,
    /// Normalized query tokens.
    pub tokens: TokenSlice,
    /// Categories the tokens resolve to, duplicates included.
    pub categories: Vec<CategoryMatch>,
    /// Locales used for category resolution, most specific first.
    pub locales: Vec<Locale>,
    /// Whether the query was picked from a category list rather than typed.
    pub is_category: bool,
    /// Bookmark group a bookmark search is limited to; `None` searches every group.
    pub bookmark_group: Option<u64>,
    /// Where results go.
    pub sink: ResultSink,
}

impl SearchJob {
    /// The same search under another mode and version, reporting on the same channel.
    pub fn restamped(&self, mode: SearchMode, version: u64) -> Self {
        Self {
            mode,
            version,
            sink: self.sink.restamped(mode, version),
            ..self.clone()
        }
    }
}

/// A search backend driven by the session manager.
///
/// Implementations run searches asynchronously and report through the job's [`ResultSink`]:
/// any number of batches followed by exactly one terminal marker.
pub trait Retrieval: Send + Sync {
    /// Starts a search. Returns `false` if the search cannot start, e.g. because the index is not
    /// ready; no callbacks may follow in that case.
    fn start_search(&self, job: SearchJob) -> bool;

    /// Asks the search running in `mode` to stop. Advisory; it may finish anyway.
    fn stop_search(&self, mode: SearchMode);

    /// Re-runs the viewport search so the map agrees with a finished combined list search.
    ///
    /// `job` is the latest viewport search restamped with a fresh version. Returns `false` if it
    /// cannot start, like [`Retrieval::start_search`].
    fn poke_viewport(&self, job: SearchJob) -> bool;
}

//! The shared result cache.
//!
//! Holds the latest result list so a consumer can re-select an item by position after the list
//! was rendered ("show result 7 on the map"). It must not be consulted for anything else.

use crate::{CacheError, SearchResult};

/// The most recent result list and the version that produced it.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    /// Cached results in list order.
    results: Vec<SearchResult>,
    /// Version of the session that produced `results`.
    version: u64,
}

impl ResultCache {
    /// Replaces the cache contents wholesale.
    pub fn store(&mut self, results: Vec<SearchResult>, version: u64) {
        self.results = results;
        self.version = version;
    }

    /// Returns the result at `index`.
    pub fn get(&self, index: usize) -> Result<&SearchResult, CacheError> {
        self.results.get(index).ok_or(CacheError::OutOfRange {
            index,
            len: self.results.len(),
        })
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Version that produced the cached results; 0 before anything was stored.
    pub fn version(&self) -> u64 {
        self.version
    }
}

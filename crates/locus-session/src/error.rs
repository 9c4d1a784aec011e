//! Error types for the locus-session crate.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::de;

use crate::SearchMode;

/// Errors surfaced to callers that submit queries.
///
/// Stale callbacks are never errors; they are dropped silently.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The retrieval layer refused to start a search, e.g. because its index is not ready.
    #[error("retrieval could not start a {mode} search")]
    StartFailure {
        /// Mode of the rejected submission.
        mode: SearchMode,
    },

    /// The submitted version does not supersede the mode's current version.
    #[error("{mode} search version {version} is not newer than current version {current}")]
    OutdatedVersion {
        /// Mode of the rejected submission.
        mode: SearchMode,
        /// Submitted version.
        version: u64,
        /// Version already registered for the mode.
        current: u64,
    },

    /// The dispatcher thread could not be started.
    #[error("failed to start session dispatcher: {0}")]
    Dispatcher(#[from] io::Error),
}

/// Errors from point retrieval in the result cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The index is outside the cached results.
    #[error("result index {index} is out of range (cache holds {len} results)")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of cached results.
        len: usize,
    },
}

/// A search mode name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown search mode '{0}'")]
pub struct ParseModeError(pub String);

/// Errors loading the places served by the in-memory retrieval.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Failed to read the places file.
    #[error("failed to read places file {path}: {source}")]
    ReadFile {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The places file is not valid TOML or does not match the schema.
    #[error("failed to parse places file {path}: {source}")]
    ParseToml {
        /// Path to the file.
        path: PathBuf,
        /// Underlying TOML error.
        source: de::Error,
    },
}

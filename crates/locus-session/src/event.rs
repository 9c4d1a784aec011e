//! Events delivered to the consumer.

use crate::{EndStatus, SearchMode, SearchResult};

/// A callback to the consumer, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// New partial results for the current session of `mode`.
    Update {
        /// Mode of the session.
        mode: SearchMode,
        /// Version of the session.
        version: u64,
        /// The batch as produced by the retrieval layer.
        results: Vec<SearchResult>,
    },
    /// The session finished; always the last event for its version.
    End {
        /// Mode of the session.
        mode: SearchMode,
        /// Version of the session.
        version: u64,
        /// How the search finished.
        status: EndStatus,
    },
}

impl SessionEvent {
    /// Mode of the session the event belongs to.
    pub fn mode(&self) -> SearchMode {
        match self {
            Self::Update { mode, .. } | Self::End { mode, .. } => *mode,
        }
    }

    /// Version of the session the event belongs to.
    pub fn version(&self) -> u64 {
        match self {
            Self::Update { version, .. } | Self::End { version, .. } => *version,
        }
    }
}

//! Version-stamped delivery from retrieval workers to the session dispatcher.

use crossbeam_channel::Sender;
use serde::Serialize;

use crate::{SearchMode, SearchResult};

/// How a search finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndStatus {
    /// The retrieval layer produced every result.
    Normal,
    /// The retrieval layer stopped early, e.g. after `stop_search`.
    Interrupted,
}

/// Payload of a [`StampedUpdate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// A batch of partial results.
    Batch(Vec<SearchResult>),
    /// Terminal marker; nothing more follows for this version.
    End(EndStatus),
}

/// An update tagged with the mode and version of the search that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct StampedUpdate {
    /// Mode of the producing search.
    pub mode: SearchMode,
    /// Version the search was launched with.
    pub version: u64,
    /// What happened.
    pub update: Update,
}

/// Messages consumed by the dispatcher thread.
#[derive(Debug)]
pub(crate) enum Dispatch {
    /// A retrieval callback.
    Update(StampedUpdate),
    /// Stop the dispatcher.
    Shutdown,
}

/// Where a retrieval worker sends its results.
///
/// Every message is stamped with the mode and version the search was launched with, so the
/// session registry can compare it against the version current at delivery time.
#[derive(Debug, Clone)]
pub struct ResultSink {
    /// Mode of the search this sink belongs to.
    mode: SearchMode,
    /// Version of the search this sink belongs to.
    version: u64,
    /// Channel to the dispatcher.
    tx: Sender<Dispatch>,
}

impl ResultSink {
    /// Creates a sink for one search.
    pub(crate) fn new(mode: SearchMode, version: u64, tx: Sender<Dispatch>) -> Self {
        Self { mode, version, tx }
    }

    /// A sink on the same channel for another search.
    pub(crate) fn restamped(&self, mode: SearchMode, version: u64) -> Self {
        Self::new(mode, version, self.tx.clone())
    }

    /// Mode of the search.
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Version of the search.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sends a batch of partial results.
    ///
    /// Returns `false` if the session manager has shut down.
    pub fn send_batch(&self, results: Vec<SearchResult>) -> bool {
        self.send(Update::Batch(results))
    }

    /// Sends the terminal marker.
    ///
    /// Returns `false` if the session manager has shut down.
    pub fn end(&self, status: EndStatus) -> bool {
        self.send(Update::End(status))
    }

    /// Stamps and sends an update.
    fn send(&self, update: Update) -> bool {
        self.tx
            .send(Dispatch::Update(StampedUpdate {
                mode: self.mode,
                version: self.version,
                update,
            }))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::unbounded;

    use super::*;

    #[test]
    fn updates_carry_launch_stamp() {
        let (tx, rx) = unbounded();
        let sink = ResultSink::new(SearchMode::Viewport, 7, tx);
        assert!(sink.send_batch(Vec::new()));
        assert!(sink.end(EndStatus::Normal));

        let stamps: Vec<_> = rx
            .try_iter()
            .map(|message| match message {
                Dispatch::Update(stamped) => (stamped.mode, stamped.version, stamped.update),
                Dispatch::Shutdown => panic!("unexpected shutdown"),
            })
            .collect();
        assert_eq!(
            stamps,
            vec![
                (SearchMode::Viewport, 7, Update::Batch(Vec::new())),
                (SearchMode::Viewport, 7, Update::End(EndStatus::Normal)),
            ]
        );
    }

    #[test]
    fn restamped_sink_shares_the_channel() {
        let (tx, rx) = unbounded();
        let combined = ResultSink::new(SearchMode::Combined, 3, tx);
        let viewport = combined.restamped(SearchMode::Viewport, 8);
        assert!(viewport.end(EndStatus::Normal));

        let stamped = match rx.try_recv() {
            Ok(Dispatch::Update(stamped)) => stamped,
            other => panic!("unexpected message: {other:?}"),
        };
        assert_eq!((stamped.mode, stamped.version), (SearchMode::Viewport, 8));
        assert_eq!((combined.mode(), combined.version()), (SearchMode::Combined, 3));
    }

    #[test]
    fn send_fails_after_receiver_drops() {
        let (tx, rx) = unbounded();
        let sink = ResultSink::new(SearchMode::Everywhere, 1, tx);
        drop(rx);
        assert!(!sink.send_batch(Vec::new()));
        assert!(!sink.end(EndStatus::Interrupted));
    }
}

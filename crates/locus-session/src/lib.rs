//! Search sessions for locus.
//!
//! Every [`SearchMode`] has at most one active session. A submission carries a caller-chosen
//! version that must exceed the mode's current one; the retrieval layer then streams results
//! back through a [`ResultSink`] stamped with that version, and the [`SessionRegistry`] lets a
//! callback through only while its version is current and its session is still running. Older
//! work is never stopped forcibly, only made unobservable.
//!
//! The [`SessionManager`] owns the registry, resolves query categories with a
//! [`locus_match::CategoryMatcher`], and runs the dispatcher thread that applies callbacks in
//! the order the retrieval layer produced them.
//!
//! [`MemoryRetrieval`] is a self-contained backend over an in-memory set of places.

#![warn(missing_docs)]

mod cache;
mod cancel;
mod error;
mod event;
mod manager;
mod memory;
mod mode;
mod registry;
mod result;
mod retrieval;
mod sink;

pub use cache::ResultCache;
pub use cancel::{CancellationHandle, CancellationToken, cancellation_pair};
pub use error::{CacheError, ParseModeError, PlacesError, SessionError};
pub use event::SessionEvent;
pub use manager::{SearchRequest, SessionManager, SessionOptions};
pub use memory::{Bookmark, Feature, MemoryRetrieval, Places, Region};
pub use mode::SearchMode;
pub use registry::{SessionRegistry, SessionState};
pub use result::{Point, SearchResult};
pub use retrieval::{Retrieval, SearchJob};
pub use sink::{EndStatus, ResultSink, StampedUpdate, Update};

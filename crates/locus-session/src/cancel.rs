//! Cooperative cancellation for retrieval workers.
//!
//! A [`CancellationHandle`] stays with whoever may stop a search; the paired
//! [`CancellationToken`] travels with the worker, which polls it between batches. Cancelling is
//! advisory: a worker that never polls simply keeps running, and the session registry drops its
//! output anyway.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Polled by a worker to learn that its search was stopped.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    /// Shared stop flag.
    flag: Arc<AtomicBool>,
}

/// Stops the search whose token shares this flag.
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    /// Shared stop flag.
    flag: Arc<AtomicBool>,
}

/// Creates a connected `(token, handle)` pair.
pub fn cancellation_pair() -> (CancellationToken, CancellationHandle) {
    let flag = Arc::new(AtomicBool::new(false));
    (
        CancellationToken {
            flag: Arc::clone(&flag),
        },
        CancellationHandle { flag },
    )
}

impl CancellationToken {
    /// Whether the paired handle has cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl CancellationHandle {
    /// Requests cancellation. Repeated calls are harmless.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn token_observes_cancel() {
        let (token, handle) = cancellation_pair();
        assert!(!token.is_cancelled());
        handle.cancel();
        handle.cancel();
        assert!(token.is_cancelled());
        assert!(handle.is_cancelled());
    }

    #[test]
    fn pairs_are_independent() {
        let (first, first_handle) = cancellation_pair();
        let (second, _second_handle) = cancellation_pair();
        first_handle.cancel();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn cancel_crosses_threads() {
        let (token, handle) = cancellation_pair();
        let worker = thread::spawn(move || {
            while !token.is_cancelled() {
                thread::yield_now();
            }
        });
        handle.cancel();
        worker.join().unwrap();
    }
}

//! A single-assignment, blocking handle for a sequence produced elsewhere.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::Error;
use crate::seq::Seq;
use crate::Element;

enum State<T> {
    Pending,
    Ready(Seq<T>),
    Failed(Arc<Error>),
}

struct Shared<T> {
    state: Mutex<State<T>>,
    completed: Condvar,
}

/// The producer side: a cell that is completed exactly once, with either a
/// sequence or a failure.
///
/// Consumers obtain any number of [`DeferredSeq`] handles via
/// [`CompletableSeq::handle`] and block on them until completion.
pub struct CompletableSeq<T> {
    shared: Arc<Shared<T>>,
}

/// The consumer side: blocks until the producer completes, then behaves as a
/// plain [`Seq`]. Cloneable; every clone observes the same completion. There
/// is no cancellation: a handle whose producer never completes waits forever
/// (use [`DeferredSeq::wait_timeout`] to bound the wait).
pub struct DeferredSeq<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Element> CompletableSeq<T> {
    pub fn new() -> Self {
        CompletableSeq {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Pending),
                completed: Condvar::new(),
            }),
        }
    }

    pub fn handle(&self) -> DeferredSeq<T> {
        DeferredSeq {
            shared: self.shared.clone(),
        }
    }

    /// Publishes the result and wakes every waiter. Returns `false` (and
    /// changes nothing) if the cell was already completed.
    pub fn complete(&self, seq: Seq<T>) -> bool {
        self.transition(State::Ready(seq))
    }

    /// Publishes a failure, re-raised to every blocked and future caller.
    /// Returns `false` if the cell was already completed.
    pub fn complete_err(&self, err: Error) -> bool {
        self.transition(State::Failed(Arc::new(err)))
    }

    fn transition(&self, next: State<T>) -> bool {
        let mut state = self.shared.state.lock().expect("poisoned deferred state");
        if !matches!(*state, State::Pending) {
            return false;
        }
        log::trace!(
            "deferred cell completed ({})",
            if matches!(&next, State::Ready(_)) { "ready" } else { "failed" }
        );
        *state = next;
        self.shared.completed.notify_all();
        true
    }
}

impl<T: Element> Default for CompletableSeq<T> {
    fn default() -> Self {
        CompletableSeq::new()
    }
}

impl<T: Element> Clone for DeferredSeq<T> {
    fn clone(&self) -> Self {
        DeferredSeq {
            shared: self.shared.clone(),
        }
    }
}

impl<T: Element> DeferredSeq<T> {
    fn extract(state: &MutexGuard<'_, State<T>>) -> Option<Result<Seq<T>, Error>> {
        match &**state {
            State::Pending => None,
            State::Ready(seq) => Some(Ok(seq.clone())),
            State::Failed(err) => Some(Err(Error::Failed(err.clone()))),
        }
    }

    /// Blocks until the producer completes, then returns the sequence or
    /// re-raises the producer's failure.
    pub fn wait(&self) -> Result<Seq<T>, Error> {
        let mut state = self.shared.state.lock().expect("poisoned deferred state");
        loop {
            if let Some(outcome) = Self::extract(&state) {
                return outcome;
            }
            state = self
                .shared
                .completed
                .wait(state)
                .expect("poisoned deferred state");
        }
    }

    /// Like [`DeferredSeq::wait`], but gives up after `timeout` and returns
    /// `Ok(None)` if the cell is still pending.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Option<Seq<T>>, Error> {
        let state = self.shared.state.lock().expect("poisoned deferred state");
        let (state, _) = self
            .shared
            .completed
            .wait_timeout_while(state, timeout, |s| matches!(*s, State::Pending))
            .expect("poisoned deferred state");
        match Self::extract(&state) {
            Some(outcome) => outcome.map(Some),
            None => Ok(None),
        }
    }

    /// Non-blocking probe: `None` while pending.
    pub fn try_get(&self) -> Option<Result<Seq<T>, Error>> {
        let state = self.shared.state.lock().expect("poisoned deferred state");
        Self::extract(&state)
    }

    // Delegating conveniences. Each blocks only while the cell is pending,
    // then dispatches synchronously to the completed sequence.

    pub fn get(&self, index: usize) -> Result<Option<T>, Error> {
        Ok(self.wait()?.get(index))
    }

    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.wait()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.wait()?.is_empty())
    }

    pub fn head_maybe(&self) -> Result<Option<T>, Error> {
        Ok(self.wait()?.head_maybe())
    }

    pub fn map<R, F>(&self, f: F) -> Result<Seq<R>, Error>
    where
        R: Element,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Ok(self.wait()?.map(f))
    }

    pub fn filter<F>(&self, pred: F) -> Result<Seq<T>, Error>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Ok(self.wait()?.filter(pred))
    }

    pub fn fold_left<R>(&self, init: R, f: impl FnMut(R, T) -> R) -> Result<R, Error> {
        Ok(self.wait()?.fold_left(init, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_get_probes_without_blocking() {
        let cell: CompletableSeq<i64> = CompletableSeq::new();
        let handle = cell.handle();
        assert!(handle.try_get().is_none());
        assert!(cell.complete(Seq::of([1, 2, 3])));
        assert_eq!(handle.try_get().unwrap().unwrap().to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn completion_is_single_assignment() {
        let cell: CompletableSeq<i64> = CompletableSeq::new();
        assert!(cell.complete(Seq::of([1])));
        assert!(!cell.complete(Seq::of([2])));
        assert!(!cell.complete_err(Error::EmptySequence));
        assert_eq!(cell.handle().wait().unwrap().to_vec(), vec![1]);
    }

    #[test]
    fn wait_timeout_reports_pending() {
        let cell: CompletableSeq<i64> = CompletableSeq::new();
        let handle = cell.handle();
        let outcome = handle.wait_timeout(Duration::from_millis(10)).unwrap();
        assert!(outcome.is_none());
    }
}

//! Pending callback registry.
//!
//! Requests to the host frame carry no correlation id, so waiting callers
//! are kept in one list per request kind and the whole list is resolved by
//! the next matching reply.

// ============================================================================
// Imports
// ============================================================================

use std::panic::{AssertUnwindSafe, catch_unwind};

use parking_lot::Mutex;
use tracing::error;

// ============================================================================
// Types
// ============================================================================

/// A one-shot callback waiting for a host reply.
pub type Callback<T> = Box<dyn FnOnce(T) + Send>;

// ============================================================================
// BatchOutcome
// ============================================================================

/// Result of resolving one batch of callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Callbacks that were invoked.
    pub invoked: usize,
    /// Callbacks that panicked while running.
    pub panicked: usize,
}

// ============================================================================
// PendingCallbacks
// ============================================================================

/// Ordered list of callbacks waiting on the same kind of reply.
pub struct PendingCallbacks<T> {
    entries: Mutex<Vec<Callback<T>>>,
}

impl<T> Default for PendingCallbacks<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl<T> PendingCallbacks<T> {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a callback to the batch.
    pub fn push<F>(&self, callback: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.entries.lock().push(Box::new(callback));
    }

    /// Returns the number of waiting callbacks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is waiting.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Removes and returns the current batch, leaving the list empty.
    #[must_use]
    pub fn take(&self) -> Vec<Callback<T>> {
        std::mem::take(&mut *self.entries.lock())
    }

    /// Resolves the current batch in insertion order.
    ///
    /// `value` is called once per callback to produce its argument. The
    /// list lock is released before any callback runs, and each callback is
    /// guarded on its own: a panic is logged and the rest still run.
    pub fn resolve_with(&self, mut value: impl FnMut() -> T) -> BatchOutcome {
        let batch = self.take();
        let mut outcome = BatchOutcome::default();

        for callback in batch {
            let argument = value();
            outcome.invoked += 1;

            if catch_unwind(AssertUnwindSafe(move || callback(argument))).is_err() {
                outcome.panicked += 1;
                error!(index = outcome.invoked - 1, "Pending callback panicked");
            }
        }

        outcome
    }
}

impl<T: Clone> PendingCallbacks<T> {
    /// Resolves the current batch with clones of one value.
    pub fn resolve(&self, value: &T) -> BatchOutcome {
        self.resolve_with(|| value.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A bounded, newest-first collection.
///
/// Inserting past `capacity` silently evicts the oldest element. The lock is
/// only held for the duration of a single push or copy, so the collection can
/// be shared freely between request handlers.
#[derive(Debug)]
pub struct CappedLog<T> {
    capacity: usize,
    entries: Mutex<VecDeque<T>>,
}

impl<T: Clone> CappedLog<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Prepend an element, evicting from the tail if the cap is exceeded.
    pub fn push(&self, item: T) {
        let mut entries = self.lock();
        entries.push_front(item);
        entries.truncate(self.capacity);
    }

    /// Build and prepend an element while holding the lock.
    ///
    /// `build` sees the current newest element, which lets callers derive
    /// ordered ids without racing other writers.
    pub fn push_with<F>(&self, build: F) -> T
    where
        F: FnOnce(Option<&T>) -> T,
    {
        let mut entries = self.lock();
        let item = build(entries.front());
        entries.push_front(item.clone());
        entries.truncate(self.capacity);
        item
    }

    /// Copy out at most `limit` elements, newest first.
    pub fn recent(&self, limit: usize) -> Vec<T> {
        self.lock().iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the deque half-written,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

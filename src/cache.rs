//! Memoization of results keyed by leaf count
//!

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// A thread-safe cache mapping a leaf count to a computed value.
///
/// Enumeration, extremal solvers and stochastic models are pure functions of the
/// leaf count, and each of them recurses into smaller leaf counts. Every component
/// owns one of these caches, so memoized results can be shared, inspected or
/// evicted explicitly with [`LeafCountCache::clear`].
///
/// Growth is unbounded: one entry is kept per leaf count that was ever requested.
/// The lock is never held while a value is being computed, so computations may
/// recurse into the same cache. If two threads compute the same entry concurrently
/// the first one to finish wins and both receive the same value.
#[derive(Debug)]
pub struct LeafCountCache<V> {
    entries: Mutex<HashMap<usize, Arc<V>>>,
}

impl<V> LeafCountCache<V> {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Get the value cached for `n` leaves, if any
    pub fn get(&self, n: usize) -> Option<Arc<V>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&n)
            .cloned()
    }

    /// Get the value cached for `n` leaves, computing and storing it if it is missing.
    ///
    /// ```
    /// use treeshape::cache::LeafCountCache;
    ///
    /// let cache = LeafCountCache::new();
    /// assert_eq!(*cache.get_or_insert_with(3, || 3 * 2), 6);
    /// // The stored value is returned, the closure is not called again
    /// assert_eq!(*cache.get_or_insert_with(3, || 0), 6);
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn get_or_insert_with(&self, n: usize, compute: impl FnOnce() -> V) -> Arc<V> {
        if let Some(value) = self.get(n) {
            return value;
        }

        let value = Arc::new(compute());

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(n)
            .or_insert(value)
            .clone()
    }

    /// Get the value cached for `n` leaves, computing it with a fallible
    /// function if it is missing. Errors are not cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        n: usize,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(value) = self.get(n) {
            return Ok(value);
        }

        let value = Arc::new(compute()?);

        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(n)
            .or_insert(value)
            .clone())
    }

    /// Number of cached leaf counts
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict every cached value
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear()
    }
}

impl<V> Default for LeafCountCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn recursive_computation() {
        fn fibonacci(cache: &LeafCountCache<u64>, n: usize) -> u64 {
            *cache.get_or_insert_with(n, || {
                if n < 2 {
                    n as u64
                } else {
                    fibonacci(cache, n - 1) + fibonacci(cache, n - 2)
                }
            })
        }

        let cache = LeafCountCache::new();
        assert_eq!(fibonacci(&cache, 50), 12_586_269_025);
        assert_eq!(cache.len(), 51);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(10).is_none());
    }

    #[test]
    fn errors_are_not_cached() {
        let cache: LeafCountCache<usize> = LeafCountCache::new();
        let failed: Result<_, &str> = cache.get_or_try_insert_with(1, || Err("nope"));
        assert!(failed.is_err());
        assert!(cache.is_empty());

        let ok: Result<_, &str> = cache.get_or_try_insert_with(1, || Ok(1));
        assert_eq!(*ok.unwrap(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn shared_between_threads() {
        let cache = Arc::new(LeafCountCache::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || *cache.get_or_insert_with(7, || i))
            })
            .collect();

        let values: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(values.iter().all(|v| *v == values[0]));
        assert_eq!(cache.len(), 1);
    }
}

//! In-memory cache holding the index of the current job-list snapshot.
//!
//! The job list changes rarely compared to how often it is searched, so the
//! caller names each snapshot (a content hash, a build id, an update
//! timestamp) and the index is rebuilt only when that name changes.

use crate::error::Result;
use crate::matcher::SearchIndex;
use std::sync::{Arc, RwLock};

struct Entry<J> {
    key: String,
    index: Arc<SearchIndex<J>>,
}

/// Single-slot index cache keyed by snapshot.
pub struct IndexCache<J> {
    slot: RwLock<Option<Entry<J>>>,
}

impl<J> Default for IndexCache<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J> IndexCache<J> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Cached index for `key`, if that snapshot is the one held.
    pub fn get(&self, key: &str) -> Option<Arc<SearchIndex<J>>> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|entry| entry.key == key)
            .map(|entry| Arc::clone(&entry.index))
    }

    /// Return the index for `key`, building it with `build` on a miss.
    ///
    /// The build runs without holding the lock, so readers of the current
    /// snapshot are never blocked by a rebuild. When two callers race on the
    /// same new key both may build; the first one stored is kept. A failed
    /// build leaves the previous entry in place.
    pub fn get_or_build<F>(&self, key: &str, build: F) -> Result<Arc<SearchIndex<J>>>
    where
        F: FnOnce() -> Result<SearchIndex<J>>,
    {
        if let Some(index) = self.get(key) {
            tracing::trace!(snapshot = key, "Index cache hit");
            return Ok(index);
        }

        let built = Arc::new(build()?);

        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        // another caller may have stored it while we were building
        if let Some(entry) = slot.as_ref().filter(|entry| entry.key == key) {
            return Ok(Arc::clone(&entry.index));
        }

        tracing::debug!(snapshot = key, "Index cache rebuilt");
        *slot = Some(Entry {
            key: key.to_string(),
            index: Arc::clone(&built),
        });
        Ok(built)
    }

    /// Key of the snapshot currently held.
    pub fn current_key(&self) -> Option<String> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map(|entry| entry.key.clone())
    }

    /// Drop the cached index.
    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::job::RawJob;
    use crate::matcher::MatchOptions;
    use crate::normalize::MetroTable;
    use std::cell::Cell;

    fn build(jobs: &[RawJob]) -> Result<SearchIndex<RawJob>> {
        SearchIndex::from_jobs(jobs, MetroTable::builtin(), MatchOptions::default())
    }

    #[test]
    fn test_builds_once_per_key() {
        let cache = IndexCache::new();
        let builds = Cell::new(0);
        let jobs = vec![RawJob::new("Engineer", "Acme", None)];

        for _ in 0..3 {
            let index = cache
                .get_or_build("v1", || {
                    builds.set(builds.get() + 1);
                    build(&jobs)
                })
                .unwrap();
            assert_eq!(index.len(), 1);
        }

        assert_eq!(builds.get(), 1);
        assert_eq!(cache.current_key().as_deref(), Some("v1"));
    }

    #[test]
    fn test_new_key_replaces_entry() {
        let cache = IndexCache::new();
        let v1 = vec![RawJob::new("Engineer", "Acme", None)];
        let v2 = vec![
            RawJob::new("Engineer", "Acme", None),
            RawJob::new("Designer", "Globex", None),
        ];

        cache.get_or_build("v1", || build(&v1)).unwrap();
        let index = cache.get_or_build("v2", || build(&v2)).unwrap();

        assert_eq!(index.len(), 2);
        assert!(cache.get("v1").is_none());
        assert!(cache.get("v2").is_some());
    }

    #[test]
    fn test_failed_build_keeps_previous() {
        let cache = IndexCache::new();
        let jobs = vec![RawJob::new("Engineer", "Acme", None)];
        cache.get_or_build("v1", || build(&jobs)).unwrap();

        let result = cache.get_or_build("v2", || Err(SearchError::InvalidOptions("boom".into())));
        assert!(result.is_err());
        assert_eq!(cache.current_key().as_deref(), Some("v1"));
    }

    #[test]
    fn test_rebuild_does_not_block_readers() {
        let cache = IndexCache::new();
        let v1 = vec![RawJob::new("Engineer", "Acme", None)];
        let v2 = vec![RawJob::new("Designer", "Globex", None)];
        cache.get_or_build("v1", || build(&v1)).unwrap();

        let index = cache
            .get_or_build("v2", || {
                // the old snapshot stays readable mid-build
                assert!(cache.get("v1").is_some());
                assert_eq!(cache.current_key().as_deref(), Some("v1"));
                build(&v2)
            })
            .unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(cache.current_key().as_deref(), Some("v2"));
    }

    #[test]
    fn test_concurrent_builders_share_first_index() {
        let cache = IndexCache::new();
        let jobs = vec![RawJob::new("Engineer", "Acme", None)];

        let outer = cache
            .get_or_build("v1", || {
                let inner = cache.get_or_build("v1", || build(&jobs)).unwrap();
                assert_eq!(inner.len(), 1);
                build(&jobs)
            })
            .unwrap();

        let stored = cache.get("v1").unwrap();
        assert!(Arc::ptr_eq(&outer, &stored));
    }

    #[test]
    fn test_clear() {
        let cache = IndexCache::new();
        let jobs: Vec<RawJob> = Vec::new();
        cache.get_or_build("v1", || build(&jobs)).unwrap();
        cache.clear();
        assert!(cache.current_key().is_none());
    }
}

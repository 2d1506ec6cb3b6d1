//! Query cache keyed by the requested set of series identifiers.

use crate::model::observation::SeriesMap;
use crate::repo::observation_repo::{ObservationStore, RepoResult};
use log::debug;
use std::collections::{BTreeSet, HashMap};

/// Canonical cache key: the sorted, deduplicated identifier set.
pub type SelectionKey = BTreeSet<String>;

/// Builds the canonical key for any iterable of identifiers.
pub fn selection_key<I, T>(series_ids: I) -> SelectionKey
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    series_ids
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .collect()
}

/// Caller-owned cache in front of an [`ObservationStore`].
///
/// Unbounded; entries live until [`QueryCache::invalidate`] or drop. The
/// store is assumed unchanged for the lifetime of cached entries.
pub struct QueryCache<S: ObservationStore> {
    store: S,
    entries: HashMap<SelectionKey, SeriesMap>,
}

impl<S: ObservationStore> QueryCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: HashMap::new(),
        }
    }

    /// Returns the per-series result for `series_ids`, querying the store
    /// only on a miss.
    pub fn fetch(&mut self, series_ids: &SelectionKey) -> RepoResult<SeriesMap> {
        if let Some(cached) = self.entries.get(series_ids) {
            debug!(
                "event=query_cache module=cache status=hit series_count={}",
                series_ids.len()
            );
            return Ok(cached.clone());
        }

        let fetched = self.store.fetch(series_ids)?;
        debug!(
            "event=query_cache module=cache status=miss series_count={} cached_entries={}",
            series_ids.len(),
            self.entries.len() + 1
        );
        self.entries.insert(series_ids.clone(), fetched.clone());
        Ok(fetched)
    }

    /// Drops every cached entry. Call after the underlying store changed.
    pub fn invalidate(&mut self) {
        debug!(
            "event=query_cache module=cache status=invalidate dropped_entries={}",
            self.entries.len()
        );
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

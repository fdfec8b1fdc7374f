//! Results of completed fetches, keyed by what was fetched.
//!
//! The cache is deliberately kept apart from the views: a view only ever
//! supplies a [`QueryKey`], while the cache alone decides whether a stored
//! result is still fresh enough to be used in place of a new fetch.
//!
//! Much like the store, the cache is provided as a context, but unlike the
//! store it is optional.  Views acquire it through [`QueryCache::handle`],
//! and if no cache was provided the handle simply passes every fetch
//! through to the store.

use std::{
    any::Any,
    collections::HashMap,
    future::Future,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use chrono::{DateTime, Utc};
use leptos::prelude::{provide_context, use_context};

use crate::error::DataAccessError;

/// Identifies one cached query result; the scope names the query and the
/// id is the community it was run for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub scope: &'static str,
    pub id: i64,
}

impl QueryKey {
    pub const COMMUNITY_POSTS: &'static str = "communityPost";
    pub const COMMUNITY: &'static str = "community";

    pub fn community_posts(id: i64) -> Self {
        Self {
            scope: Self::COMMUNITY_POSTS,
            id,
        }
    }

    pub fn community(id: i64) -> Self {
        Self {
            scope: Self::COMMUNITY,
            id,
        }
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, CacheEntry>>>,
    stale_time: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl QueryCache {
    /// Create a cache whose entries are considered fresh for
    /// `stale_time` after they were fetched.  A zero stale time means
    /// entries are never fresh.
    pub fn new(stale_time: Duration) -> Self {
        Self {
            entries: Default::default(),
            stale_time,
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Provide a new cache as a context for the views below the current
    /// reactive owner.
    pub fn provide(stale_time: Duration) -> Self {
        let cache = Self::new(stale_time);
        provide_context(cache.clone());
        cache
    }

    /// Acquire a handle to a possibly provided cache.
    ///
    /// This uses [`use_context`], so it should be called at the top
    /// level of a component.
    pub fn handle() -> QueryCacheHandle {
        QueryCacheHandle {
            inner: use_context::<QueryCache>(),
        }
    }

    pub fn insert<T>(&self, key: QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.insert_at(key, value, Utc::now());
    }

    pub(crate) fn insert_at<T>(&self, key: QueryKey, value: T, fetched_at: DateTime<Utc>)
    where
        T: Send + Sync + 'static,
    {
        let entry = CacheEntry {
            value: Arc::new(value),
            fetched_at,
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }

    /// Return the cached value for the key if one of the requested type
    /// exists and has not gone stale.
    pub fn get_fresh<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + 'static,
    {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;
        if !self.is_fresh(entry.fetched_at) {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>) -> bool {
        match Utc::now().signed_duration_since(fetched_at).to_std() {
            Ok(age) => age < self.stale_time,
            // fetched_at lies in the future, i.e. the clock moved backwards
            Err(_) => !self.stale_time.is_zero(),
        }
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Drop every entry fetched for the community.
    pub fn invalidate_community(&self, id: i64) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|key, _| key.id != id);
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A handle to a possibly available [`QueryCache`].
#[derive(Clone, Default)]
pub struct QueryCacheHandle {
    inner: Option<QueryCache>,
}

impl From<QueryCache> for QueryCacheHandle {
    fn from(cache: QueryCache) -> Self {
        Self { inner: Some(cache) }
    }
}

impl QueryCacheHandle {
    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    /// Return the fresh cached result for the key, or await `fetch` and
    /// cache its result if it succeeded.
    ///
    /// The `fetch` future is only polled on a cache miss.  Errors are
    /// never cached, so a failed fetch is retried on the next request.
    pub async fn get_or_fetch<T, F>(&self, key: QueryKey, fetch: F) -> Result<T, DataAccessError>
    where
        T: Clone + Send + Sync + 'static,
        F: Future<Output = Result<T, DataAccessError>>,
    {
        let Some(cache) = &self.inner else {
            return fetch.await;
        };
        if let Some(value) = cache.get_fresh::<T>(&key) {
            leptos::logging::log!("cache hit for {}:{}", key.scope, key.id);
            return Ok(value);
        }
        let value = fetch.await?;
        cache.insert(key, value.clone());
        Ok(value)
    }
}
